use super::*;

/// Store a home, work or additional address.
///
/// Returns `None` if nobody is signed in.
pub fn save_address<R>(
    repo: &R,
    session: &Session,
    role: Option<AddressRole>,
    address: NewAddress,
) -> Result<Option<SavedAddress>>
where
    R: AddressRepo + ?Sized,
{
    if !is_signed_in(session, "saving an address") {
        return Ok(None);
    }
    let saved = usecases::upsert_address(repo, session, role, address).map_err(|err| {
        warn!("Failed to save address: {}", err);
        err
    })?;
    Ok(Some(saved))
}

pub fn delete_address<R>(repo: &R, session: &Session, id: &str) -> Result<()>
where
    R: AddressRepo + ?Sized,
{
    if !is_signed_in(session, "deleting an address") {
        return Ok(());
    }
    Ok(usecases::delete_address(repo, session, id).map_err(|err| {
        warn!("Failed to delete address {id}: {}", err);
        err
    })?)
}

pub fn address_book<R>(repo: &R, session: &Session) -> Result<AddressBook>
where
    R: AddressRepo + ?Sized,
{
    if !session.is_signed_in() {
        return Ok(AddressBook::default());
    }
    Ok(usecases::load_address_book(repo, session)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, tests::prelude::*};
    use floodwatch_core::usecases::Error as ParameterError;

    fn queen_street() -> NewAddress {
        NewAddress {
            title: "Office".into(),
            coordinate: Coordinate::new(-27.4698, 153.0251),
            formatted_address: "Queen St, Brisbane City QLD 4000".into(),
        }
    }

    #[test]
    fn saving_without_user_is_skipped() {
        let db = memory_store();
        let saved = save_address(&db, &Session::anonymous(), None, queen_street()).unwrap();
        assert!(saved.is_none());
        assert_eq!(db.backend().get("users").unwrap(), None);
    }

    #[test]
    fn unusable_user_id_counts_as_anonymous() {
        let db = memory_store();
        for session in [Session::signed_in(""), Session::signed_in("a/b")] {
            let saved = save_address(&db, &session, None, queen_street()).unwrap();
            assert!(saved.is_none());
            delete_address(&db, &session, "x").unwrap();
            assert_eq!(address_book(&db, &session).unwrap(), AddressBook::default());
        }
        assert_eq!(db.backend().get("users").unwrap(), None);
    }

    #[test]
    fn save_and_delete_address() {
        let db = memory_store();
        let session = Session::signed_in("alice");
        let saved = save_address(&db, &session, None, queen_street())
            .unwrap()
            .unwrap();
        save_address(&db, &session, Some(AddressRole::Work), queen_street()).unwrap();
        let book = address_book(&db, &session).unwrap();
        assert_eq!(book.saved, vec![saved.clone()]);
        assert_eq!(book.work.unwrap().title, "Work");

        delete_address(&db, &session, saved.id.as_str()).unwrap();
        assert!(address_book(&db, &session).unwrap().saved.is_empty());
    }

    #[test]
    fn reject_empty_address() {
        let db = memory_store();
        let session = Session::signed_in("alice");
        let address = NewAddress {
            formatted_address: " ".into(),
            ..queen_street()
        };
        let err = save_address(&db, &session, None, address).unwrap_err();
        assert!(matches!(
            err,
            AppError::Business(crate::error::BError::Parameter(ParameterError::EmptyAddress))
        ));
    }
}
