use strum::{Display, EnumString};

use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq)]
pub struct Shelter {
    pub title: String,
    pub description: String,
    pub phone: String,
    pub address: String,
    pub coordinate: Coordinate,
}

/// How a list of shelters is ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ShelterOrder {
    /// By distance to the user, nearest first.
    #[default]
    Closest,
    Furthest,
    /// By title, independent of the location of the user.
    Alphabetical,
}

/// The shelters that are known without any further configuration
/// (greater Brisbane area).
pub fn default_shelters() -> Vec<Shelter> {
    vec![
        Shelter {
            title: "Anglicare Southern Queensland".into(),
            description: "Childcare, Counseling, Education, Employment, Health, Mental Health, \
                          Physical Health, Substance Abuse, Homeless Shelters, Family Shelters, \
                          Women's Shelters, Youth Shelters, Housing, Maintenance, \
                          Rental Assistance, Utility Assistance"
                .into(),
            phone: "1300 114 397".into(),
            address: "21 Anstey Street, Albion, QLD, 4010".into(),
            coordinate: Coordinate::new(-27.430270, 153.042470),
        },
        Shelter {
            title: "Centacare".into(),
            description: "Childcare, Counseling, Education, Health, Mental Health, \
                          Physical Health, Homeless Shelters, Day Shelters, Transportation"
                .into(),
            phone: "1300 236 822".into(),
            address: "122A William Street, Brisbane CBD, QLD, 4000".into(),
            coordinate: Coordinate::new(-27.472300, 153.023630),
        },
        Shelter {
            title: "Encircle".into(),
            description: "Childcare, Counseling, Education, Housing, Legal Assistance".into(),
            phone: "(07) 3889 0063".into(),
            address: "865 Gympie Road, Lawnton, QLD, 4501".into(),
            coordinate: Coordinate::new(-27.278550, 152.982310),
        },
    ]
}
