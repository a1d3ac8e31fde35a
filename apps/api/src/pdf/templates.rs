//! Named LaTeX resume templates.
//!
//! Interpolation uses `((`/`))` for variables and `((*`/`*))` for blocks so
//! the template engine's control sequences never collide with LaTeX's own
//! `{`/`}`/`\` syntax (and vice versa). Field values arriving here have
//! already been escaped by the sanitizer.

/// Template for free-tier output. Single column, compact.
pub const CLASSIC: &str = r#"\documentclass[10pt]{article}
\usepackage[margin=1in]{geometry}
\usepackage{enumitem}
\usepackage{titlesec}
\usepackage{xcolor}
\titleformat{\section}{\large\bfseries}{}{0em}{}[\titlerule]
\setlist[itemize]{leftmargin=*,nosep}
\pagestyle{empty}
\begin{document}

\begin{center}
{\LARGE \textbf{((personal_info.name))}}\\[4pt]
((personal_info.email))((* if personal_info.phone *)) \textbar{} ((personal_info.phone))((* endif *))((* if personal_info.location *)) \textbar{} ((personal_info.location))((* endif *))
((* if personal_info.linkedin *))\\ ((personal_info.linkedin))((* endif *))
\end{center}

((* if summary *))
\section{Professional Summary}
((summary))
((* endif *))
((* if skills *))
\section{Technical Skills}
((* for skill in skills *))((skill))((* if not loop.last *)) \textbullet{} ((* endif *))((* endfor *))
((* endif *))
((* if experience *))
\section{Professional Experience}
((* for exp in experience *))
\textbf{((exp.title))} --- ((exp.company))((* if exp.location *)), ((exp.location))((* endif *)) \hfill ((exp.start_date)) -- ((exp.end_date))
((* if exp.bullet_points *))
\begin{itemize}
((* for point in exp.bullet_points *))  \item ((point))
((* endfor *))\end{itemize}
((* endif *))
((* endfor *))
((* endif *))
((* if education *))
\section{Education}
((* for edu in education *))
\textbf{((edu.degree))} --- ((edu.institution)) \hfill ((edu.start_date)) -- ((edu.end_date))
((* if edu.gpa *))\\ GPA: ((edu.gpa))((* endif *))

((* endfor *))
((* endif *))
((* if projects *))
\section{Projects}
((* for proj in projects *))
\textbf{((proj.name))}((* if proj.description *)) --- ((proj.description))((* endif *))
((* if proj.technologies *))\\ Technologies: ((* for tech in proj.technologies *))((tech))((* if not loop.last *)), ((* endif *))((* endfor *))((* endif *))

((* endfor *))
((* endif *))
((* if certifications *))
\section{Certifications}
\begin{itemize}
((* for cert in certifications *))  \item ((cert.name)) --- ((cert.issuer))((* if cert.date *)), ((cert.date))((* endif *))
((* endfor *))\end{itemize}
((* endif *))
((* if not is_premium *))
\vfill
\begin{center}
{\footnotesize \textcolor{gray}{Generated by TailorCV --- AI-Powered Resume Generator}}
\end{center}
((* endif *))
\end{document}
"#;

/// Template for premium output. Two-tone headers, no watermark block.
pub const PROFESSIONAL: &str = r#"\documentclass[11pt]{article}
\usepackage[margin=0.9in]{geometry}
\usepackage{enumitem}
\usepackage{titlesec}
\usepackage{xcolor}
\definecolor{accent}{HTML}{2563EB}
\titleformat{\section}{\large\bfseries\color{accent}}{}{0em}{}[\textcolor{accent}{\titlerule}]
\setlist[itemize]{leftmargin=*,nosep}
\pagestyle{empty}
\begin{document}

\begin{center}
{\Huge \textbf{((personal_info.name))}}\\[6pt]
((personal_info.email))((* if personal_info.phone *)) \textbar{} ((personal_info.phone))((* endif *))((* if personal_info.location *)) \textbar{} ((personal_info.location))((* endif *))
((* if personal_info.linkedin *))\\ ((personal_info.linkedin))((* endif *))((* if personal_info.github *)) \textbar{} ((personal_info.github))((* endif *))
\end{center}

((* if summary *))
\section{Summary}
((summary))
((* endif *))
((* if skills *))
\section{Skills}
((* for skill in skills *))((skill))((* if not loop.last *)) \textbullet{} ((* endif *))((* endfor *))
((* endif *))
((* if experience *))
\section{Experience}
((* for exp in experience *))
\textbf{((exp.title))} \textbar{} ((exp.company))((* if exp.location *)), ((exp.location))((* endif *)) \hfill \textit{((exp.start_date)) -- ((exp.end_date))}
((* if exp.bullet_points *))
\begin{itemize}
((* for point in exp.bullet_points *))  \item ((point))
((* endfor *))\end{itemize}
((* endif *))
((* endfor *))
((* endif *))
((* if education *))
\section{Education}
((* for edu in education *))
\textbf{((edu.degree))} \textbar{} ((edu.institution)) \hfill \textit{((edu.start_date)) -- ((edu.end_date))}
((* if edu.gpa *))\\ GPA: ((edu.gpa))((* endif *))

((* endfor *))
((* endif *))
((* if projects *))
\section{Projects}
((* for proj in projects *))
\textbf{((proj.name))}((* if proj.description *)) --- ((proj.description))((* endif *))
((* if proj.technologies *))\\ \textit{((* for tech in proj.technologies *))((tech))((* if not loop.last *)), ((* endif *))((* endfor *))}((* endif *))

((* endfor *))
((* endif *))
((* if certifications *))
\section{Certifications}
\begin{itemize}
((* for cert in certifications *))  \item ((cert.name)) --- ((cert.issuer))((* if cert.date *)), ((cert.date))((* endif *))
((* endfor *))\end{itemize}
((* endif *))
\end{document}
"#;

/// All registered templates by name.
pub const TEMPLATES: &[(&str, &str)] = &[("classic", CLASSIC), ("professional", PROFESSIONAL)];

/// Default template name for a tier: premium users get `professional`.
pub fn default_for_tier(is_premium: bool) -> &'static str {
    if is_premium {
        "professional"
    } else {
        "classic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contains_both_tiers() {
        assert!(TEMPLATES.iter().any(|(name, _)| *name == "classic"));
        assert!(TEMPLATES.iter().any(|(name, _)| *name == "professional"));
    }

    #[test]
    fn test_default_template_per_tier() {
        assert_eq!(default_for_tier(false), "classic");
        assert_eq!(default_for_tier(true), "professional");
    }

    #[test]
    fn test_only_free_template_carries_watermark_block() {
        assert!(CLASSIC.contains("Generated by TailorCV"));
        assert!(!PROFESSIONAL.contains("Generated by TailorCV"));
    }
}
