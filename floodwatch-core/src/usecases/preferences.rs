use super::prelude::*;

/// Load the preferences of the signed in user.
///
/// Users without stored preferences get the defaults
/// which are persisted on the first read.
pub fn get_preferences<R>(repo: &R, session: &Session) -> Result<UserPreferences>
where
    R: PreferencesRepo + ?Sized,
{
    let user_id = session.require_user()?;
    if let Some(preferences) = repo.load_preferences(user_id)? {
        return Ok(preferences);
    }
    let preferences = UserPreferences::default();
    log::debug!("Store default preferences for user {user_id}");
    repo.save_preferences(user_id, &preferences)?;
    Ok(preferences)
}

pub fn set_preference<R>(repo: &R, session: &Session, key: PreferenceKey, value: bool) -> Result<()>
where
    R: PreferencesRepo + ?Sized,
{
    let user_id = session.require_user()?;
    log::debug!("Set preference {key} of user {user_id} to {value}");
    repo.save_preference(user_id, key, value)?;
    Ok(())
}
