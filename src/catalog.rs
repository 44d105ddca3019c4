use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use crate::error::{invalid, CalcError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    UnitConversion,
    Dosage,
    Pharmacokinetics,
    Clinical,
    Formulation,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::UnitConversion,
        Category::Dosage,
        Category::Pharmacokinetics,
        Category::Clinical,
        Category::Formulation,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::UnitConversion => "Unit conversion",
            Category::Dosage => "Dosage",
            Category::Pharmacokinetics => "Pharmacokinetics",
            Category::Clinical => "Clinical scores",
            Category::Formulation => "Formulation",
        };
        f.write_str(name)
    }
}

impl FromStr for Category {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "unit_conversion" | "units" => Ok(Category::UnitConversion),
            "dosage" => Ok(Category::Dosage),
            "pharmacokinetics" | "pk" => Ok(Category::Pharmacokinetics),
            "clinical" => Ok(Category::Clinical),
            "formulation" => Ok(Category::Formulation),
            _ => Err(invalid(format!("Unknown tool category: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tool {
    pub name: &'static str,
    pub category: Category,
    pub route: &'static str,
}

const fn tool(name: &'static str, category: Category, route: &'static str) -> Tool {
    Tool { name, category, route }
}

pub static TOOLS: &[Tool] = &[
    tool("Mass converter", Category::UnitConversion, "/tools/mass-converter"),
    tool("Volume converter", Category::UnitConversion, "/tools/volume-converter"),
    tool("Concentration converter", Category::UnitConversion, "/tools/concentration-converter"),
    tool("Weight-based dose", Category::Dosage, "/tools/weight-based-dose"),
    tool("Volume to administer", Category::Dosage, "/tools/volume-to-administer"),
    tool("IV drip rate", Category::Dosage, "/tools/drip-rate"),
    tool("Infusion rate", Category::Dosage, "/tools/infusion-rate"),
    tool("Half-life", Category::Pharmacokinetics, "/tools/half-life"),
    tool("Elimination rate constant", Category::Pharmacokinetics, "/tools/elimination-rate"),
    tool("Clearance", Category::Pharmacokinetics, "/tools/clearance"),
    tool("Volume of distribution", Category::Pharmacokinetics, "/tools/volume-of-distribution"),
    tool("Loading dose", Category::Pharmacokinetics, "/tools/loading-dose"),
    tool("Maintenance dose", Category::Pharmacokinetics, "/tools/maintenance-dose"),
    tool("Bioavailability", Category::Pharmacokinetics, "/tools/bioavailability"),
    tool("Accumulation ratio", Category::Pharmacokinetics, "/tools/accumulation-ratio"),
    tool("Time to steady state", Category::Pharmacokinetics, "/tools/steady-state"),
    tool("AUC (trapezoidal)", Category::Pharmacokinetics, "/tools/auc"),
    tool("QTc interval", Category::Clinical, "/tools/qtc"),
    tool("CHA2DS2-VASc score", Category::Clinical, "/tools/cha2ds2-vasc"),
    tool("HAS-BLED score", Category::Clinical, "/tools/has-bled"),
    tool("Creatinine clearance", Category::Clinical, "/tools/creatinine-clearance"),
    tool("Body mass index", Category::Clinical, "/tools/bmi"),
    tool("Body surface area", Category::Clinical, "/tools/bsa"),
    tool("Particle size analyzer", Category::Formulation, "/tools/particle-size"),
    tool("Dissolution profile", Category::Formulation, "/tools/dissolution-profile"),
    tool("Reynolds number", Category::Formulation, "/tools/reynolds-number"),
];

pub fn by_category(category: Category) -> impl Iterator<Item = &'static Tool> {
    TOOLS.iter().filter(move |t| t.category == category)
}

pub fn find_by_route(route: &str) -> Option<&'static Tool> {
    TOOLS.iter().find(|t| t.route == route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_routes_are_unique() {
        let routes: HashSet<_> = TOOLS.iter().map(|t| t.route).collect();
        assert_eq!(routes.len(), TOOLS.len());
    }

    #[test]
    fn test_every_category_has_tools() {
        for category in Category::ALL {
            assert!(by_category(category).count() > 0, "{} has no tools", category);
        }
    }

    #[test]
    fn test_find_by_route() {
        let tool = find_by_route("/tools/particle-size").unwrap();
        assert_eq!(tool.category, Category::Formulation);
        assert!(find_by_route("/tools/unknown").is_none());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("unit-conversion".parse::<Category>().unwrap(), Category::UnitConversion);
        assert_eq!("PK".parse::<Category>().unwrap(), Category::Pharmacokinetics);
        assert!("cosmetics".parse::<Category>().is_err());
    }
}
