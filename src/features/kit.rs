use serde::Deserialize;

use crate::error::FeatureError;

const DEFAULT_SHIRT_BASE: &str = "#E1E1E1";

#[derive(Debug, Deserialize)]
struct KitDesign {
    kit_shirt_type: Option<String>,
    kit_shirt_logo: Option<String>,
    kit_socks_type: Option<String>,
    kit_shorts: Option<String>,
    kit_shirt_base: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KitSummary {
    pub kit: bool,
    pub shirt_type: Option<String>,
    pub shirt_logo: Option<String>,
    pub socks_type: Option<String>,
    pub shorts: Option<String>,
    /// Shirt, socks and shorts all chosen and the shirt recoloured.
    pub full: bool,
}

fn chosen(part: &Option<String>) -> bool {
    part.as_deref()
        .map(|value| !value.eq_ignore_ascii_case("none"))
        .unwrap_or(false)
}

pub fn summarise_kit(kit: Option<&str>) -> Result<KitSummary, FeatureError> {
    let Some(raw) = kit.filter(|raw| !raw.trim().is_empty()) else {
        return Ok(KitSummary::default());
    };
    let design: KitDesign = serde_json::from_str(raw).map_err(FeatureError::Kit)?;

    let recoloured = design
        .kit_shirt_base
        .as_deref()
        .map(|base| !base.eq_ignore_ascii_case(DEFAULT_SHIRT_BASE))
        .unwrap_or(false);
    let full = chosen(&design.kit_shirt_type)
        && chosen(&design.kit_socks_type)
        && chosen(&design.kit_shorts)
        && recoloured;

    Ok(KitSummary {
        kit: true,
        shirt_type: design.kit_shirt_type,
        shirt_logo: design.kit_shirt_logo,
        socks_type: design.kit_socks_type,
        shorts: design.kit_shorts,
        full,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIT: &str = r##"{"kit_shirt_type":"stripes","kit_shirt_base":"#ff0000",
        "kit_shirt_logo":"none","kit_shorts":"#000000","kit_socks_type":"hoops"}"##;

    #[test]
    fn designed_kit_is_full() {
        let summary = summarise_kit(Some(KIT)).expect("kit parses");
        assert!(summary.kit);
        assert!(summary.full);
        assert_eq!(summary.shirt_type.as_deref(), Some("stripes"));
        assert_eq!(summary.shirt_logo.as_deref(), Some("none"));
    }

    #[test]
    fn default_shirt_colour_is_not_full() {
        let kit = KIT.replace("#ff0000", "#e1e1e1");
        let summary = summarise_kit(Some(&kit)).expect("kit parses");
        assert!(summary.kit);
        assert!(!summary.full);
    }

    #[test]
    fn unset_socks_are_not_full() {
        let kit = KIT.replace("hoops", "None");
        assert!(!summarise_kit(Some(&kit)).expect("kit parses").full);
    }

    #[test]
    fn missing_kit_is_empty() {
        assert_eq!(summarise_kit(None).expect("no kit"), KitSummary::default());
        assert!(!summarise_kit(Some("")).expect("no kit").kit);
    }

    #[test]
    fn malformed_kit_is_an_error() {
        assert!(matches!(summarise_kit(Some("{kit")), Err(FeatureError::Kit(_))));
    }
}
