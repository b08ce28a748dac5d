use serde::{Serialize, Deserialize};

/// One record of the read-only city catalog (data/cities.json)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
    pub country: String,
    pub region: String,
}
