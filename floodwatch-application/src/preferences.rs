use super::*;

/// Preferences of the signed in user or the defaults
/// for anonymous users.
pub fn load_preferences<R>(repo: &R, session: &Session) -> Result<UserPreferences>
where
    R: PreferencesRepo + ?Sized,
{
    if !session.is_signed_in() {
        debug!("No user signed in: use default preferences");
        return Ok(UserPreferences::default());
    }
    Ok(usecases::get_preferences(repo, session).map_err(|err| {
        warn!("Failed to load preferences: {}", err);
        err
    })?)
}

pub fn set_preference<R>(repo: &R, session: &Session, key: PreferenceKey, value: bool) -> Result<()>
where
    R: PreferencesRepo + ?Sized,
{
    if !is_signed_in(session, "updating preferences") {
        return Ok(());
    }
    Ok(usecases::set_preference(repo, session, key, value).map_err(|err| {
        warn!("Failed to set preference {key}: {}", err);
        err
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::prelude::*;

    #[test]
    fn anonymous_users_get_defaults_without_writes() {
        let db = memory_store();
        let session = Session::anonymous();
        assert_eq!(
            load_preferences(&db, &session).unwrap(),
            UserPreferences::default()
        );
        set_preference(&db, &session, PreferenceKey::Routes, false).unwrap();
        assert_eq!(db.backend().get("users").unwrap(), None);
    }

    #[test]
    fn toggle_preference() {
        let db = memory_store();
        let session = Session::signed_in("alice");
        assert!(load_preferences(&db, &session).unwrap().push_notifications);
        set_preference(&db, &session, PreferenceKey::PushNotifications, false).unwrap();
        let prefs = load_preferences(&db, &session).unwrap();
        assert!(!prefs.push_notifications);
        assert!(!prefs.flood_alerts_enabled());
    }
}
