use std::fmt;

use crate::views::Palette;

const STEPS: [(&str, &str); 4] = [
    (
        "Upload",
        "Pick your resume as a PDF or DOCX file, up to 10MB.",
    ),
    (
        "Extract",
        "The text is pulled out of the document on the server.",
    ),
    (
        "Analyze",
        "Keywords, skills and formatting are scored, optionally against a job description.",
    ),
    (
        "Improve",
        "Review the score breakdown, copy the recommendations and download a PDF report.",
    ),
];

pub struct AboutPage {
    pub palette: Palette,
}

impl fmt::Display for AboutPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let palette = self.palette;
        writeln!(f, "{}", palette.bold("ATS Resume Scorer"))?;
        writeln!(
            f,
            "Applicant Tracking Systems filter resumes before a recruiter ever reads them."
        )?;
        writeln!(
            f,
            "Get an instant score for how well yours will parse and match, with concrete tips to raise it."
        )?;
        writeln!(f)?;
        writeln!(f, "{}", palette.bold("How it works"))?;
        for (i, (title, detail)) in STEPS.iter().enumerate() {
            writeln!(f, "  {}. {} - {}", i + 1, title, detail)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{}",
            palette.dim("Run `ats interactive` to get started, or `ats analyze <file>` for a one-shot score.")
        )
    }
}

pub fn render(palette: Palette) -> String {
    AboutPage { palette }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_about_lists_steps_in_order() {
        let page = render(Palette::plain());
        let upload = page.find("1. Upload").unwrap();
        let improve = page.find("4. Improve").unwrap();
        assert!(upload < improve);
        assert!(page.contains("PDF or DOCX"));
    }
}
