//! Prompt constants for the resume-optimization LLM call.

pub const OPTIMIZE_SYSTEM: &str = "You are an expert resume writer and ATS optimization \
specialist. You optimize resumes for specific job descriptions while maintaining accuracy \
and professionalism. You never fabricate experience or skills.";

/// Prompt template. `{resume_data}` and `{job_description}` are filled in by
/// the client. The model must answer with a single JSON object in the
/// ResumeRecord shape.
pub const OPTIMIZE_PROMPT_TEMPLATE: &str = r#"Analyze the following resume and job description, then rewrite the resume so it better matches the job requirements.

RESUME DATA:
{resume_data}

JOB DESCRIPTION:
{job_description}

INSTRUCTIONS:
1. Identify the key skills, requirements, and keywords in the job description.
2. Rewrite the resume content to highlight the relevant experience and skills.
3. Keep the resume ATS-friendly: plain wording, measurable achievements, keywords from the job description.
4. Do not invent experience, employers, dates, or credentials that are not in the resume data.
5. Respond with ONLY a JSON object in exactly this shape (omit optional fields you cannot fill):

{
    "personalInfo": {
        "name": "Full Name",
        "email": "email@example.com",
        "phone": "phone number",
        "location": "City, State",
        "linkedin": "linkedin url",
        "github": "github url",
        "website": "website url"
    },
    "summary": "Professional summary optimized for this job (2-3 sentences)",
    "skills": ["skill1", "skill2"],
    "experience": [
        {
            "title": "Job Title",
            "company": "Company Name",
            "location": "City, State",
            "startDate": "MM/YYYY",
            "endDate": "MM/YYYY or Present",
            "description": ["Achievement 1", "Achievement 2"]
        }
    ],
    "education": [
        {
            "degree": "Degree Title",
            "institution": "School Name",
            "location": "City, State",
            "startDate": "MM/YYYY",
            "endDate": "MM/YYYY",
            "gpa": "GPA"
        }
    ],
    "projects": [
        {
            "name": "Project Name",
            "description": "What it does and why it matters for this job",
            "technologies": ["tech1", "tech2"],
            "link": "project url"
        }
    ],
    "certifications": [
        {
            "name": "Certification Name",
            "issuer": "Issuing Organization",
            "date": "MM/YYYY"
        }
    ]
}

Return only the JSON object, no additional text or formatting."#;
