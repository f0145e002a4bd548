use super::prelude::*;

fn validate_address(address: &NewAddress) -> Result<()> {
    if address.formatted_address.trim().is_empty() {
        return Err(Error::EmptyAddress);
    }
    if !address.coordinate.is_valid() {
        return Err(Error::InvalidPosition);
    }
    Ok(())
}

/// Store an address of the signed in user.
///
/// With a role the single home or work address is overwritten,
/// without a role a new saved address is appended.
pub fn upsert_address<R>(
    repo: &R,
    session: &Session,
    role: Option<AddressRole>,
    address: NewAddress,
) -> Result<SavedAddress>
where
    R: AddressRepo + ?Sized,
{
    let user_id = session.require_user()?;
    validate_address(&address)?;
    match role {
        Some(role) => {
            let address = NewAddress {
                title: role.title().to_owned(),
                ..address
            };
            repo.save_role_address(user_id, role, &address)?;
            log::debug!("Stored {role} address of user {user_id}");
            Ok(address.into_saved(role.to_string().into()))
        }
        None => {
            let saved = repo.create_saved_address(user_id, address)?;
            log::debug!("Stored address {} of user {user_id}", saved.id);
            Ok(saved)
        }
    }
}

pub fn delete_address<R>(repo: &R, session: &Session, id: &str) -> Result<()>
where
    R: AddressRepo + ?Sized,
{
    let user_id = session.require_user()?;
    repo.delete_saved_address(user_id, id)?;
    Ok(())
}

pub fn load_address_book<R>(repo: &R, session: &Session) -> Result<AddressBook>
where
    R: AddressRepo + ?Sized,
{
    let user_id = session.require_user()?;
    Ok(repo.load_address_book(user_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::tests::MockDb;

    fn new_address(formatted: &str) -> NewAddress {
        NewAddress {
            title: "Somewhere".into(),
            coordinate: Coordinate::new(-27.47, 153.02),
            formatted_address: formatted.into(),
        }
    }

    #[test]
    fn upsert_home_twice() {
        let db = MockDb::default();
        let session = Session::signed_in("alice");
        let addr = new_address("1 Queen St, Brisbane");
        upsert_address(&db, &session, Some(AddressRole::Home), addr.clone()).unwrap();
        let first = load_address_book(&db, &session).unwrap();
        upsert_address(&db, &session, Some(AddressRole::Home), addr).unwrap();
        let second = load_address_book(&db, &session).unwrap();
        assert_eq!(first, second);
        let home = second.home.unwrap();
        assert_eq!(home.title, "Home");
        assert_eq!(home.formatted_address, "1 Queen St, Brisbane");
        assert!(second.saved.is_empty());
        assert!(second.work.is_none());
    }

    #[test]
    fn append_and_delete_saved_addresses() {
        let db = MockDb::default();
        let session = Session::signed_in("alice");
        let a = upsert_address(&db, &session, None, new_address("A")).unwrap();
        let b = upsert_address(&db, &session, None, new_address("B")).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(load_address_book(&db, &session).unwrap().saved.len(), 2);

        delete_address(&db, &session, a.id.as_str()).unwrap();
        let book = load_address_book(&db, &session).unwrap();
        assert_eq!(book.saved, vec![b]);
    }

    #[test]
    fn reject_invalid_addresses() {
        let db = MockDb::default();
        let session = Session::signed_in("alice");
        assert!(matches!(
            upsert_address(&db, &session, None, new_address("  ")),
            Err(Error::EmptyAddress)
        ));
        let mut addr = new_address("Nowhere");
        addr.coordinate = Coordinate::new(100.0, 0.0);
        assert!(matches!(
            upsert_address(&db, &session, Some(AddressRole::Work), addr),
            Err(Error::InvalidPosition)
        ));
    }

    #[test]
    fn writes_require_a_user() {
        let db = MockDb::default();
        let result = upsert_address(&db, &Session::anonymous(), None, new_address("A"));
        assert!(matches!(result, Err(Error::Unauthorized)));
    }
}
