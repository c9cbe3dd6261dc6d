//! Per-day user input classification (spec §4.6).

#[derive(Debug, Clone, PartialEq)]
pub enum DayInput {
    Ordinals(Vec<usize>),
    Names(Vec<String>),
    Skip,
    Done,
    ShowMore,
    Auto,
    Cancel,
}

pub fn parse_day_input(text: &str) -> DayInput {
    let lower = text.trim().to_lowercase();

    if lower == "skip" {
        return DayInput::Skip;
    }
    if lower == "done" || lower == "tiếp" || lower == "ok" {
        return DayInput::Done;
    }
    if lower == "xem thêm" {
        return DayInput::ShowMore;
    }
    if lower == "auto" {
        return DayInput::Auto;
    }
    if lower == "huỷ" || lower == "hủy" {
        return DayInput::Cancel;
    }

    let ordinals: Vec<usize> = lower
        .split([',', ' '])
        .filter_map(|tok| tok.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .collect();
    if !ordinals.is_empty() {
        return DayInput::Ordinals(ordinals);
    }

    let names: Vec<String> = lower
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    DayInput::Names(names)
}

#[derive(Debug, Clone, PartialEq)]
pub enum StartDateInput {
    Explicit(String),
    DontKnow,
}

pub fn parse_start_date_input(text: &str) -> StartDateInput {
    let lower = text.trim().to_lowercase();
    if lower.contains("don't know") || lower.contains("không biết") || lower.contains("chưa biết") {
        StartDateInput::DontKnow
    } else {
        StartDateInput::Explicit(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_ordinals() {
        assert_eq!(parse_day_input("1, 3, 5"), DayInput::Ordinals(vec![1, 3, 5]));
    }

    #[test]
    fn parses_control_tokens() {
        assert_eq!(parse_day_input("done"), DayInput::Done);
        assert_eq!(parse_day_input("tiếp"), DayInput::Done);
        assert_eq!(parse_day_input("auto"), DayInput::Auto);
        assert_eq!(parse_day_input("huỷ"), DayInput::Cancel);
    }

    #[test]
    fn falls_back_to_names_when_not_numeric() {
        assert_eq!(parse_day_input("Fansipan, Cat Cat Village"), DayInput::Names(vec!["fansipan".to_string(), "cat cat village".to_string()]));
    }

    #[test]
    fn detects_dont_know_start_date() {
        assert_eq!(parse_start_date_input("I don't know"), StartDateInput::DontKnow);
        assert_eq!(parse_start_date_input("2026-08-01"), StartDateInput::Explicit("2026-08-01".to_string()));
    }
}
