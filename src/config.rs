//! Service configuration
//!
//! YAML-backed configuration: listen address, label-detection settings, and
//! the category rule table. `Config::default()` carries the canonical
//! built-in table so the service runs without a config file; use
//! `--generate-config` to dump it as a starting point for curation.

use crate::error::Result;
use crate::rules::{CategoryRule, RuleTable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub vision: VisionConfig,
    /// Ordered category rules. Order is match priority: keep specific
    /// categories above ones with generic keywords.
    pub categories: Vec<CategoryRule>,
}

/// Settings for the Google Cloud Vision label-detection call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Name of the environment variable holding the API key. The key itself
    /// never lives in the config file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_listen_addr() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_endpoint() -> String {
    "https://vision.googleapis.com/v1/images:annotate".to_string()
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_max_results() -> u32 {
    10
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for VisionConfig {
    fn default() -> Self {
        VisionConfig {
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            max_results: default_max_results(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build the validated rule table from the configured categories.
    pub fn rule_table(&self) -> Result<RuleTable> {
        RuleTable::new(self.categories.clone())
    }
}

fn category(name: &str, keywords: &[&str], disposal: &str) -> CategoryRule {
    CategoryRule {
        name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        disposal: disposal.to_string(),
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_addr: default_listen_addr(),
            vision: VisionConfig::default(),
            categories: default_categories(),
        }
    }
}

/// The built-in rule table.
///
/// Order matters: lids come before cups (a "plastic cup lid" label contains
/// the substring "plastic cup"), specific bottle types before the generic
/// "plastic bottle" fallback of the water-bottle rule, jars before beverage
/// bottles, and the organics with the catch-all "food" keyword near the end.
fn default_categories() -> Vec<CategoryRule> {
    vec![
        category(
            "aerosol_cans",
            &[
                "aerosol",
                "spray can",
                "deodorant can",
                "paint can",
                "compressed gas can",
                "spray paint",
                "air freshener can",
                "gas can",
            ],
            "Make sure the can is completely empty before disposal. Check with your local \
             recycling program for acceptance. If not recyclable, dispose of as hazardous \
             waste. Never puncture or incinerate pressurized cans.",
        ),
        category(
            "aluminum_soda_cans",
            &[
                "soda can",
                "beverage can",
                "aluminum drink can",
                "soft drink can",
                "cola can",
                "energy drink can",
                "beer can",
                "carbonated drink can",
            ],
            "Rinse the can to remove any sticky residue. Place it in your recycling bin. \
             Avoid crushing it if your recycling program requires intact cans for sorting.",
        ),
        category(
            "aluminum_food_cans",
            &[
                "aluminum can",
                "food tin",
                "canned food",
                "soup can",
                "vegetable can",
                "aluminum tin",
                "aluminum food container",
                "metal can",
            ],
            "Rinse the can thoroughly to remove any food residue. Place it in your \
             recycling bin. Crushing the can is optional, but it helps save space. If your \
             program doesn't accept aluminum, dispose of it properly as scrap metal.",
        ),
        category(
            "steel_food_cans",
            &[
                "steel food can",
                "steel can",
                "tin can",
                "steel tin",
                "metal food can",
                "food can",
            ],
            "Clean the can by removing all food residue and place it in your recycling \
             bin. Steel cans are accepted by most recycling programs; check local \
             guidelines if unsure.",
        ),
        category(
            "glass_food_jars",
            &[
                "glass jar",
                "food jar",
                "preserve jar",
                "mason jar",
                "jam jar",
                "pickle jar",
                "sauce jar",
                "spice jar",
                "canning jar",
            ],
            "Rinse the jar to remove any food residue and recycle it in the glass bin. \
             Metal lids can often be recycled separately; remove labels and plastic lids \
             before recycling.",
        ),
        category(
            "glass_cosmetic_containers",
            &[
                "cosmetic bottle",
                "perfume bottle",
                "cosmetic jar",
                "beauty container",
                "skincare container",
                "cosmetic packaging",
                "glass container",
            ],
            "Clean the container so it is free of residue and recycle it if your local \
             program accepts glass containers. Remove metal or plastic parts first. Wrap \
             broken glass in paper before placing it in general waste.",
        ),
        category(
            "glass_beverage_bottles",
            &[
                "glass bottle",
                "beverage bottle",
                "wine bottle",
                "beer bottle",
                "liquor bottle",
                "glass drink bottle",
                "glass drink container",
            ],
            "Rinse thoroughly to remove any liquid residue and place the bottle in your \
             glass recycling bin. Remove caps or lids if they are not glass. Wrap broken \
             glass in paper or cardboard and place it in general waste.",
        ),
        category(
            "plastic_soda_bottles",
            &[
                "plastic soda bottle",
                "soda bottle",
                "carbonated drink bottle",
                "soft drink bottle",
                "cola bottle",
            ],
            "Empty and rinse the bottle before recycling. Leave the cap on if your \
             recycling program accepts it. Crush the bottle to save space if desired.",
        ),
        category(
            "plastic_detergent_bottles",
            &[
                "detergent bottle",
                "laundry detergent bottle",
                "detergent container",
                "cleaning supply bottle",
                "plastic cleaning bottle",
            ],
            "Rinse out any remaining detergent to avoid contamination. Check the \
             recycling symbol and place the bottle in plastics recycling. Keep the lid on \
             if your program accepts it.",
        ),
        category(
            "plastic_water_bottles",
            &[
                "plastic water bottle",
                "water bottle",
                "disposable water bottle",
                "single-use water bottle",
                "plastic bottle",
            ],
            "Rinse the bottle to ensure cleanliness. Recycle the bottle along with the \
             cap if accepted. Try to use reusable bottles to reduce plastic waste.",
        ),
        category(
            "plastic_cup_lids",
            &[
                "plastic lid",
                "cup lid",
                "beverage lid",
                "takeout lid",
                "coffee cup lid",
                "soda lid",
                "plastic top",
            ],
            "If marked recyclable, clean the lid and place it in the appropriate bin. \
             Otherwise dispose of it in general waste. Consider reusable lids or cups.",
        ),
        category(
            "styrofoam_cups",
            &[
                "styrofoam cup",
                "foam cup",
                "polystyrene cup",
                "disposable foam cup",
            ],
            "Styrofoam is not recyclable in most areas; dispose of it in general waste. \
             Choose paper or reusable cups to reduce environmental impact.",
        ),
        category(
            "plastic_cups",
            &[
                "plastic cup",
                "disposable plastic cup",
                "plastic drink cup",
                "single-use plastic cup",
                "drinking cup",
            ],
            "Check if your local program accepts recyclable plastics. If not, dispose of \
             the cup in general waste. Opt for reusable cups to reduce waste.",
        ),
        category(
            "paper_cups",
            &[
                "paper cup",
                "coffee cup",
                "takeout cup",
                "disposable cup",
                "paper drink cup",
                "cardboard cup",
            ],
            "Check for a recycling symbol to confirm if recyclable. Most paper cups with \
             plastic lining are not recyclable and go into general waste. Consider \
             switching to reusable cups.",
        ),
        category(
            "styrofoam_food_containers",
            &[
                "styrofoam container",
                "foam food container",
                "polystyrene food container",
                "styrofoam tray",
                "foam box",
            ],
            "Clean the container before disposal if required. Place it in general waste \
             as Styrofoam is typically non-recyclable. Consider switching to \
             biodegradable or compostable containers.",
        ),
        category(
            "plastic_food_containers",
            &[
                "plastic food container",
                "plastic food box",
                "takeout container",
                "plastic storage container",
                "disposable food container",
                "plastic lunchbox",
            ],
            "Ensure the container is clean and free of food residue. Recycle it if \
             marked as recyclable; otherwise dispose of it in general waste. Consider \
             reusable containers to reduce single-use plastics.",
        ),
        category(
            "disposable_plastic_cutlery",
            &[
                "plastic cutlery",
                "plastic spoon",
                "plastic fork",
                "plastic knife",
                "disposable utensil",
                "plastic tableware",
                "single-use cutlery",
            ],
            "Most disposable plastic cutlery is not recyclable; place it in the general \
             waste bin. Some programs accept compostable plastics, so check local \
             guidelines. Consider reusable or compostable alternatives.",
        ),
        category(
            "plastic_straws",
            &[
                "plastic straw",
                "drinking straw",
                "disposable straw",
                "single-use straw",
            ],
            "Plastic straws are not recyclable in most programs; dispose of them in \
             general waste. Consider reusable or biodegradable straws.",
        ),
        category(
            "plastic_shopping_bags",
            &[
                "plastic shopping bag",
                "grocery bag",
                "shopping bag",
                "plastic carry bag",
                "plastic sack",
            ],
            "Reuse them for storage or as garbage liners. If drop-off recycling for \
             plastic film is available, take them there. Do not place them in curbside \
             recycling bins; most programs do not accept plastic bags.",
        ),
        category(
            "plastic_trash_bags",
            &[
                "plastic trash bag",
                "garbage bag",
                "trash bag",
                "bin liner",
                "waste bag",
                "plastic liner",
            ],
            "Trash bags themselves are not recyclable. Dispose of them in general waste \
             along with their contents. Look for biodegradable options when buying new \
             ones.",
        ),
        category(
            "cardboard_boxes",
            &[
                "cardboard box",
                "cardboard",
                "packaging box",
                "shipping box",
                "moving box",
                "corrugated box",
                "carton box",
                "pizza box",
                "paperboard",
            ],
            "Flatten the box to save space before recycling. Remove any non-cardboard \
             elements like tape, labels, and plastic inserts. Boxes with heavy food \
             staining may not be recyclable and should go into general waste.",
        ),
        category(
            "newspaper",
            &["newspaper", "newsprint", "daily news", "tabloid", "broadsheet"],
            "Keep newspapers dry and free of contaminants like food stains. Recycle them \
             in designated paper bins; bundle them for easier handling if required.",
        ),
        category(
            "magazines",
            &[
                "magazine",
                "periodical",
                "journal",
                "publication",
                "printed material",
                "book",
            ],
            "Remove plastic covers or non-paper elements before recycling. Place \
             magazines in your paper recycling bin and keep them dry and free from food \
             stains.",
        ),
        category(
            "office_paper",
            &[
                "office paper",
                "printer paper",
                "copy paper",
                "notebook",
                "letterhead",
                "shredded paper",
                "writing paper",
                "printed paper",
                "cardstock",
            ],
            "Shred confidential documents before recycling if necessary. Avoid paper \
             with heavy lamination or plastic content. Recycle clean, dry paper in the \
             designated paper bin.",
        ),
        category(
            "coffee_grounds",
            &[
                "coffee grounds",
                "coffee filter",
                "used coffee",
                "coffee waste",
                "brewed coffee",
            ],
            "Coffee grounds are rich in nutrients and can be composted; add them to your \
             compost bin or garden soil. Paper-based filters compost too. Otherwise use \
             organic waste bins.",
        ),
        category(
            "tea_bags",
            &["tea bag", "tea leaves", "used tea", "herbal tea"],
            "Compost biodegradable tea bags as they are rich in organic matter. Check if \
             your tea bags have plastic components and dispose of those in general waste.",
        ),
        category(
            "eggshells",
            &["eggshell", "egg shell", "egg carton", "cracked egg"],
            "Eggshells can be composted and are beneficial for soil; rinse them and add \
             them to your compost bin. If composting is not possible, use organic waste \
             bins.",
        ),
        category(
            "food_waste",
            &[
                "food waste",
                "leftovers",
                "organic waste",
                "kitchen scraps",
                "fruit peel",
                "vegetable scraps",
                "food scraps",
                "compost",
                "food",
            ],
            "Separate food waste from packaging before disposal. Compost food scraps if \
             possible to reduce landfill impact, or use organic waste bins where \
             available.",
        ),
        category(
            "shoes",
            &[
                "shoe",
                "footwear",
                "sneaker",
                "sandal",
                "boot",
                "high heel",
                "flip flop",
                "running shoe",
            ],
            "Donate shoes that are still wearable to charities or thrift stores. For \
             damaged or unusable shoes, check for textile recycling bins. Avoid \
             discarding them in general waste.",
        ),
        category(
            "clothing",
            &[
                "clothes",
                "clothing",
                "fabric",
                "textile",
                "garment",
                "apparel",
                "jacket",
                "shirt",
                "pants",
                "dress",
                "jeans",
                "sweater",
                "scarf",
                "coat",
                "sock",
            ],
            "If the clothing is still wearable, consider donating it to local charities \
             or thrift stores. For damaged items, use textile recycling bins where \
             available. Avoid throwing clothes in the trash; fabric can be repurposed.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::UNKNOWN_CATEGORY;

    #[test]
    fn default_config_builds_valid_table() {
        let config = Config::default();
        let table = config.rule_table().expect("default table must validate");
        assert!(!table.is_empty());
        assert!(table.get("plastic_water_bottles").is_some());
        assert!(table.get("coffee_grounds").is_some());
        assert!(table.get("eggshells").is_some());
        assert!(table.get("plastic_cups").is_some());
    }

    #[test]
    fn unknown_sentinel_is_not_a_category() {
        let table = Config::default().rule_table().unwrap();
        assert!(table.get(UNKNOWN_CATEGORY).is_none());
    }

    #[test]
    fn yaml_round_trip_preserves_order() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed.listen_addr, config.listen_addr);
        assert_eq!(parsed.categories.len(), config.categories.len());
        for (a, b) in parsed.categories.iter().zip(config.categories.iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.keywords, b.keywords);
        }
    }

    #[test]
    fn missing_optional_fields_fall_back_to_defaults() {
        let yaml = r#"
categories:
  - name: cans
    keywords: ["can"]
    disposal: "Recycle it."
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:5000");
        assert_eq!(config.vision.api_key_env, "GOOGLE_API_KEY");
        assert_eq!(config.vision.max_results, 10);
    }
}
