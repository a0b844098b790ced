use crate::models::is_whole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Percentage,
    Value,
    PartitionValue,
    RankAscending,
    RankDescending,
}

impl Placeholder {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "percentage" => Some(Self::Percentage),
            "value" => Some(Self::Value),
            "partition_value" => Some(Self::PartitionValue),
            "rank_ascending" => Some(Self::RankAscending),
            "rank_descending" => Some(Self::RankDescending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateValues {
    pub percentage: Option<String>,
    pub value: Option<String>,
    pub partition_value: Option<String>,
    pub rank_ascending: Option<String>,
    pub rank_descending: Option<String>,
}

impl TemplateValues {
    fn get(&self, placeholder: Placeholder) -> Option<&str> {
        match placeholder {
            Placeholder::Percentage => self.percentage.as_deref(),
            Placeholder::Value => self.value.as_deref(),
            Placeholder::PartitionValue => self.partition_value.as_deref(),
            Placeholder::RankAscending => self.rank_ascending.as_deref(),
            Placeholder::RankDescending => self.rank_descending.as_deref(),
        }
    }
}

/// Substitutes known `<token>`s; unknown tokens and stray brackets pass through.
pub fn render(template: &str, values: &TemplateValues) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('<') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let token = after
            .find('>')
            .map(|close| &after[..close])
            .filter(|token| !token.contains('<'));

        match token {
            Some(token) => {
                match Placeholder::from_token(token).and_then(|p| values.get(p)) {
                    Some(replacement) => output.push_str(replacement),
                    None => {
                        output.push('<');
                        output.push_str(token);
                        output.push('>');
                    }
                }
                rest = &after[token.len() + 1..];
            }
            None => {
                output.push('<');
                rest = after;
            }
        }
    }
    output.push_str(rest);
    output
}

/// English ordinal: 1st, 2nd, 3rd, 4th, 11th, 12th, 13th, 21st, 111th.
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

pub fn thousands(value: f64) -> String {
    let text = if is_whole(value) {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    };

    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(stripped) => ("-", stripped),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (position, digit) in integer.chars().enumerate() {
        if position > 0 && (integer.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

pub fn percentage_label(percentage: f64) -> String {
    if is_whole(percentage) {
        format!("{}%", percentage as i64)
    } else {
        format!("{percentage}%")
    }
}
