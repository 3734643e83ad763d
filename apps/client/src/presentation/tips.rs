pub const NO_TIPS_MESSAGE: &str = "No recommendations available. Your resume looks great!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipItem {
    /// 1-based, as displayed.
    pub number: usize,
    pub text: String,
}

pub fn numbered_tips(tips: &[String]) -> Vec<TipItem> {
    tips.iter()
        .enumerate()
        .map(|(i, text)| TipItem {
            number: i + 1,
            text: text.clone(),
        })
        .collect()
}

pub fn tips_summary(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} improvement{plural} suggested")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering_starts_at_one_and_keeps_order() {
        let tips = vec!["Add more keywords".to_string(), "Use bullet points".to_string()];
        let items = numbered_tips(&tips);
        assert_eq!(items[0].number, 1);
        assert_eq!(items[1].number, 2);
        assert_eq!(items[1].text, "Use bullet points");
    }

    #[test]
    fn test_summary_pluralization() {
        assert_eq!(tips_summary(0), "0 improvements suggested");
        assert_eq!(tips_summary(1), "1 improvement suggested");
        assert_eq!(tips_summary(4), "4 improvements suggested");
    }
}
