use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Departments offered by the directory forms. Employees store the
/// department as free text, so this list is advisory.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
    IntoStaticStr,
)]
pub enum Department {
    Engineering,
    #[serde(rename = "Human Resources")]
    #[strum(serialize = "Human Resources")]
    HumanResources,
    Design,
    Marketing,
    Finance,
    Operations,
}

impl Department {
    pub fn names() -> Vec<&'static str> {
        Department::iter().map(Into::into).collect()
    }
}
