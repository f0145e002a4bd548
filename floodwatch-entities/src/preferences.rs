use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum PreferenceKey {
    LocationServices,
    FloodZoneWarnings,
    Routes,
    PushNotifications,
}

impl PreferenceKey {
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserPreferences {
    pub location_services: bool,
    pub flood_zone_warnings: bool,
    pub routes: bool,
    pub push_notifications: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            location_services: true,
            flood_zone_warnings: true,
            routes: true,
            push_notifications: true,
        }
    }
}

impl UserPreferences {
    pub const fn get(&self, key: PreferenceKey) -> bool {
        match key {
            PreferenceKey::LocationServices => self.location_services,
            PreferenceKey::FloodZoneWarnings => self.flood_zone_warnings,
            PreferenceKey::Routes => self.routes,
            PreferenceKey::PushNotifications => self.push_notifications,
        }
    }

    pub fn set(&mut self, key: PreferenceKey, value: bool) {
        let flag = match key {
            PreferenceKey::LocationServices => &mut self.location_services,
            PreferenceKey::FloodZoneWarnings => &mut self.flood_zone_warnings,
            PreferenceKey::Routes => &mut self.routes,
            PreferenceKey::PushNotifications => &mut self.push_notifications,
        };
        *flag = value;
    }

    pub const fn show_user_location(&self) -> bool {
        self.location_services
    }

    pub const fn show_flood_zones(&self) -> bool {
        self.flood_zone_warnings
    }

    pub const fn show_routes(&self) -> bool {
        self.routes && self.location_services
    }

    pub const fn flood_alerts_enabled(&self) -> bool {
        self.flood_zone_warnings && self.push_notifications
    }
}
