pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::{prediction_builder::*, saved_address_builder::*, shelter_builder::*};

pub mod shelter_builder {

    use super::*;
    use crate::{geo::*, shelter::*};

    #[derive(Debug)]
    pub struct ShelterBuild {
        shelter: Shelter,
    }

    impl ShelterBuild {
        pub fn title(mut self, title: &str) -> Self {
            self.shelter.title = title.into();
            self
        }
        pub fn pos(mut self, pos: Coordinate) -> Self {
            self.shelter.coordinate = pos;
            self
        }
        pub fn phone(mut self, phone: &str) -> Self {
            self.shelter.phone = phone.into();
            self
        }
        pub fn finish(self) -> Shelter {
            self.shelter
        }
    }

    impl Builder for Shelter {
        type Build = ShelterBuild;
        fn build() -> Self::Build {
            ShelterBuild {
                shelter: Shelter {
                    title: "".into(),
                    description: "".into(),
                    phone: "".into(),
                    address: "".into(),
                    coordinate: Coordinate::default(),
                },
            }
        }
    }
}

pub mod saved_address_builder {

    use super::*;
    use crate::{address::*, geo::*, id::*};

    #[derive(Debug)]
    pub struct SavedAddressBuild {
        address: SavedAddress,
    }

    impl SavedAddressBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.address.id = id.into();
            self
        }
        pub fn title(mut self, title: &str) -> Self {
            self.address.title = title.into();
            self
        }
        pub fn pos(mut self, pos: Coordinate) -> Self {
            self.address.coordinate = pos;
            self
        }
        pub fn formatted_address(mut self, address: &str) -> Self {
            self.address.formatted_address = address.into();
            self
        }
        pub fn finish(self) -> SavedAddress {
            self.address
        }
    }

    impl Builder for SavedAddress {
        type Build = SavedAddressBuild;
        fn build() -> Self::Build {
            SavedAddressBuild {
                address: SavedAddress {
                    id: Id::new(),
                    title: "".into(),
                    coordinate: Coordinate::default(),
                    formatted_address: "".into(),
                },
            }
        }
    }
}

pub mod prediction_builder {

    use super::*;
    use crate::prediction::*;

    #[derive(Debug)]
    pub struct FloodPredictionBuild {
        prediction: FloodPrediction,
    }

    impl FloodPredictionBuild {
        pub fn date(mut self, date: &str) -> Self {
            self.prediction.date = date.into();
            self
        }
        pub fn risk_level(mut self, level: u8) -> Self {
            self.prediction.risk_level = level;
            self
        }
        pub fn finish(self) -> FloodPrediction {
            self.prediction
        }
    }

    impl Builder for FloodPrediction {
        type Build = FloodPredictionBuild;
        fn build() -> Self::Build {
            FloodPredictionBuild {
                prediction: FloodPrediction {
                    date: "2024-10-26".into(),
                    risk_level: 0,
                },
            }
        }
    }
}
