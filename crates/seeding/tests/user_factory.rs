//! User factory persistence through the in-memory store.

use seeding::prelude::*;
use users::{GUEST, Roles};

#[tokio::test]
async fn test_create_persists_users_with_addresses() {
    let (services, store) = Services::in_memory(SeedConfig::default().with_rng_seed(5));

    let users = UserFactory::from_services(&services)
        .unwrap()
        .times(3)
        .create()
        .await
        .unwrap();

    assert_eq!(users.len(), 3);
    assert_eq!(store.users().await.len(), 3);
    assert_eq!(store.addresses().await.len(), 3);

    for user in &users {
        let address = user.address.as_ref().unwrap();
        assert_eq!(address.user_id, user.id);
        assert_eq!(address.locale.as_deref(), Some(user.locale.as_str()));
    }
}

#[tokio::test]
async fn test_create_one_with_overrides() {
    let (services, store) = Services::in_memory(SeedConfig::default());
    let services = services.with_roles(Roles::new(["admin"]));

    let user = UserFactory::from_services(&services)
        .unwrap()
        .with_email("admin@example.com")
        .with_role_key("admin")
        .with_address(definition! { "city" => "Bern", "country_key" => "CH" })
        .create_one()
        .await
        .unwrap();

    let stored = store.find_user(user.id).await.unwrap();
    assert_eq!(stored.email, "admin@example.com");
    assert_eq!(stored.role_key, "admin");

    let address = &store.addresses().await[0];
    assert_eq!(address.user_id, user.id);
    assert_eq!(address.city.as_deref(), Some("Bern"));
    assert_eq!(address.country_key.as_deref(), Some("CH"));
    assert!(address.postcode.is_some());
}

#[tokio::test]
async fn test_entity_modifiers_see_stored_users() {
    let (services, _store) = Services::in_memory(SeedConfig::default());

    let users = UserFactory::from_services(&services)
        .unwrap()
        .times(2)
        .modify_entity(|_, mut user| {
            user.username = Some(format!("user-{}", user.id.simple()));
            user
        })
        .create()
        .await
        .unwrap();

    assert!(users.iter().all(|u| u.username.is_some()));
    assert!(users.iter().all(|u| u.role_key == GUEST));
}

#[tokio::test]
async fn test_duplicate_email_fails() {
    let (services, _store) = Services::in_memory(SeedConfig::default());

    let result = UserFactory::from_services(&services)
        .unwrap()
        .times(2)
        .with_email("same@example.com")
        .create()
        .await;

    assert!(matches!(result, Err(SeedingError::Storage(_))));
}

#[tokio::test]
async fn test_factories_from_one_seeded_services_do_not_collide() {
    let (services, store) = Services::in_memory(SeedConfig::default().with_rng_seed(42));

    let factory = || UserFactory::from_services(&services).unwrap();
    let a = factory().create_one().await.unwrap();
    let b = factory().create_one().await.unwrap();

    assert_ne!(a.email, b.email);
    assert_eq!(store.users().await.len(), 2);
}

#[tokio::test]
async fn test_factory_after_seed_command() {
    let (services, store) = Services::in_memory(
        SeedConfig::default().with_user_count(1).with_rng_seed(42),
    );
    let mut app = Seeding::boot(services).with_default_seeders();
    let mut io = ConsoleIo::new(Vec::new());

    app.run_command(Command::Seed(SeedCommand::default()), &mut io)
        .await
        .unwrap();
    UserFactory::from_services(app.services())
        .unwrap()
        .create_one()
        .await
        .unwrap();

    assert_eq!(store.users().await.len(), 2);
}

#[test]
fn test_same_rng_seed_reproduces_emails() {
    let emails = || {
        let (services, _store) = Services::in_memory(SeedConfig::default().with_rng_seed(42));
        UserFactory::from_services(&services)
            .unwrap()
            .times(2)
            .raw()
            .unwrap()
            .into_iter()
            .map(|d| d["email"].clone())
            .collect::<Vec<_>>()
    };

    assert_eq!(emails(), emails());
}
