use crate::core::errors::UserSphereError;
use crate::core::models::user::{CreateUserInput, Pagination, UpdateUserInput};
use crate::core::services::ListUsersParams;
use crate::tests::{address_input, create_test_service, user_input};
use futures::future::join_all;
use std::sync::Arc;

fn search(term: &str) -> ListUsersParams {
    ListUsersParams {
        search: Some(term.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_then_get_round_trips() {
    let service = create_test_service();
    let created = service
        .create_user(user_input("Ada Lovelace", "Ada@Example.com"))
        .await
        .unwrap();
    assert!(created.id > 0);
    assert_eq!(created.email, "ada@example.com");
    assert_eq!(created.company.as_deref(), Some("Acme Corp"));
    assert_eq!(created.created_at, created.updated_at);

    let fetched = service.get_user(&created.id.to_string()).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_ids_strictly_increase_and_are_never_reused() {
    let service = create_test_service();
    let first = service.create_user(user_input("First User", "first@example.com")).await.unwrap();
    let second = service.create_user(user_input("Second User", "second@example.com")).await.unwrap();
    assert!(second.id > first.id);

    service.delete_user(&second.id.to_string()).await.unwrap();
    let third = service.create_user(user_input("Third User", "third@example.com")).await.unwrap();
    assert!(third.id > second.id);
}

#[tokio::test]
async fn test_duplicate_email_is_case_insensitive() {
    let service = create_test_service();
    service.create_user(user_input("Ada Lovelace", "ada@example.com")).await.unwrap();

    let result = service.create_user(user_input("Ada Again", "ADA@EXAMPLE.COM")).await;
    assert!(matches!(result, Err(UserSphereError::EmailAlreadyRegistered(_))));

    let page = service.list_users(ListUsersParams::default()).await.unwrap();
    assert_eq!(page.pagination.total, 1);
}

#[tokio::test]
async fn test_concurrent_duplicate_creates_admit_one() {
    let service = Arc::new(create_test_service());
    let attempts = (0..16).map(|i| {
        let service = service.clone();
        async move {
            service
                .create_user(user_input(&format!("Racer {i}"), "race@example.com"))
                .await
        }
    });
    let results = join_all(attempts).await;

    let created = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(UserSphereError::EmailAlreadyRegistered(_))))
        .count();
    assert_eq!(created, 1);
    assert_eq!(duplicates, 15);
}

#[tokio::test]
async fn test_concurrent_duplicate_creates_across_tasks() {
    let service = Arc::new(create_test_service());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create_user(user_input(&format!("Spawned {i}"), "spawned@example.com"))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            created += 1;
        }
    }
    assert_eq!(created, 1);
}

#[tokio::test]
async fn test_invalid_create_never_reaches_the_store() {
    let service = create_test_service();
    let mut input = user_input("Ada Lovelace", "ada@example.com");
    input.address = Some(address_input("", "X", "1"));
    let result = service.create_user(input).await;
    assert!(matches!(result, Err(UserSphereError::Validation(_))));
    assert_eq!(service.store().count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_merges_supplied_fields() {
    let service = create_test_service();
    let created = service.create_user(user_input("Ada Lovelace", "ada@example.com")).await.unwrap();

    let updated = service
        .update_user(
            &created.id.to_string(),
            UpdateUserInput {
                name: Some("Ada King".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Ada King");
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.phone, created.phone);
    assert_eq!(updated.company, created.company);
    assert_eq!(updated.address, created.address);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_update_company_omitted_kept_null_cleared() {
    let service = create_test_service();
    let created = service.create_user(user_input("Ada Lovelace", "ada@example.com")).await.unwrap();
    let id = created.id.to_string();

    let omitted: UpdateUserInput = serde_json::from_str(r#"{"phone":"555.123.4567"}"#).unwrap();
    let kept = service.update_user(&id, omitted).await.unwrap();
    assert_eq!(kept.company.as_deref(), Some("Acme Corp"));

    let empty: UpdateUserInput = serde_json::from_str(r#"{"company":""}"#).unwrap();
    let cleared = service.update_user(&id, empty).await.unwrap();
    assert_eq!(cleared.company, None);

    let replaced: UpdateUserInput = serde_json::from_str(r#"{"company":"Analytical Engines"}"#).unwrap();
    let restored = service.update_user(&id, replaced).await.unwrap();
    assert_eq!(restored.company.as_deref(), Some("Analytical Engines"));

    let null: UpdateUserInput = serde_json::from_str(r#"{"company":null}"#).unwrap();
    assert_eq!(service.update_user(&id, null).await.unwrap().company, None);
}

#[tokio::test]
async fn test_update_email_uniqueness_excludes_own_row() {
    let service = create_test_service();
    let ada = service.create_user(user_input("Ada Lovelace", "ada@example.com")).await.unwrap();
    service.create_user(user_input("Grace Hopper", "grace@example.com")).await.unwrap();

    let own = UpdateUserInput {
        email: Some("ADA@example.com".into()),
        ..Default::default()
    };
    assert!(service.update_user(&ada.id.to_string(), own).await.is_ok());

    let taken = UpdateUserInput {
        email: Some("Grace@Example.com".into()),
        ..Default::default()
    };
    let result = service.update_user(&ada.id.to_string(), taken).await;
    assert!(matches!(result, Err(UserSphereError::EmailAlreadyRegistered(_))));

    // The released address becomes available once the owner moves off it.
    let moved = UpdateUserInput {
        email: Some("countess@example.com".into()),
        ..Default::default()
    };
    service.update_user(&ada.id.to_string(), moved).await.unwrap();
    assert!(service.create_user(user_input("New Ada", "ada@example.com")).await.is_ok());
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let service = create_test_service();
    let input = UpdateUserInput {
        name: Some("XY".into()),
        ..Default::default()
    };
    let result = service.update_user("999999", input).await;
    assert!(matches!(result, Err(UserSphereError::UserNotFound(999999))));
}

#[tokio::test]
async fn test_delete_twice_is_not_found() {
    let service = create_test_service();
    let created = service.create_user(user_input("Ada Lovelace", "ada@example.com")).await.unwrap();
    let id = created.id.to_string();

    service.delete_user(&id).await.unwrap();
    assert!(matches!(service.delete_user(&id).await, Err(UserSphereError::UserNotFound(_))));
    assert!(matches!(service.get_user(&id).await, Err(UserSphereError::UserNotFound(_))));
}

#[tokio::test]
async fn test_invalid_identifiers_are_rejected_before_lookup() {
    let service = create_test_service();
    assert!(matches!(service.get_user("abc").await, Err(UserSphereError::InvalidIdentifier(_))));
    assert!(matches!(service.delete_user("0").await, Err(UserSphereError::InvalidIdentifier(_))));
    let result = service.update_user("-1", UpdateUserInput::default()).await;
    assert!(matches!(result, Err(UserSphereError::InvalidIdentifier(_))));
}

#[tokio::test]
async fn test_list_empty_store() {
    let service = create_test_service();
    let page = service
        .list_users(ListUsersParams {
            page: Some(1),
            limit: Some(10),
            search: Some(String::new()),
        })
        .await
        .unwrap();
    assert!(page.users.is_empty());
    assert_eq!(
        page.pagination,
        Pagination {
            total: 0,
            page: 1,
            limit: 10,
            total_pages: 0
        }
    );
}

#[tokio::test]
async fn test_list_paginates_newest_first() {
    let service = create_test_service();
    for i in 0..12 {
        service
            .create_user(user_input(&format!("User {i:02}"), &format!("user{i}@example.com")))
            .await
            .unwrap();
    }

    let first = service
        .list_users(ListUsersParams {
            limit: Some(5),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(first.pagination.total, 12);
    assert_eq!(first.pagination.total_pages, 3);
    let names: Vec<_> = first.users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["User 11", "User 10", "User 09", "User 08", "User 07"]);

    let last = service
        .list_users(ListUsersParams {
            page: Some(3),
            limit: Some(5),
            ..Default::default()
        })
        .await
        .unwrap();
    let names: Vec<_> = last.users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["User 01", "User 00"]);

    let beyond = service
        .list_users(ListUsersParams {
            page: Some(9),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(beyond.users.is_empty());
    assert_eq!(beyond.pagination.total, 12);
}

#[tokio::test]
async fn test_list_rejects_zero_page_or_limit() {
    let service = create_test_service();
    let zero_page = ListUsersParams {
        page: Some(0),
        ..Default::default()
    };
    let err = service.list_users(zero_page).await.unwrap_err();
    assert_eq!(err.field_errors().unwrap()[0].field, "page");

    let zero_limit = ListUsersParams {
        limit: Some(0),
        ..Default::default()
    };
    let err = service.list_users(zero_limit).await.unwrap_err();
    assert_eq!(err.field_errors().unwrap()[0].field, "limit");
}

#[tokio::test]
async fn test_search_matches_name_email_company_case_insensitively() {
    let service = create_test_service();
    service.create_user(user_input("Ada Lovelace", "ada@example.com")).await.unwrap();
    let mut grace = user_input("Grace Hopper", "grace@navy.mil");
    grace.company = Some("US Navy".into());
    service.create_user(grace).await.unwrap();
    let mut alan = user_input("Alan Turing", "alan@example.com");
    alan.company = None;
    service.create_user(alan).await.unwrap();

    let by_name = service.list_users(search("LOVELACE")).await.unwrap();
    assert_eq!(by_name.users.len(), 1);
    assert_eq!(by_name.users[0].name, "Ada Lovelace");

    let by_email = service.list_users(search("navy.MIL")).await.unwrap();
    assert_eq!(by_email.users[0].name, "Grace Hopper");

    let by_company = service.list_users(search("acme")).await.unwrap();
    assert_eq!(by_company.pagination.total, 1);

    let substring = service.list_users(search("a")).await.unwrap();
    assert_eq!(substring.pagination.total, 3);

    let blank = service.list_users(search("   ")).await.unwrap();
    assert_eq!(blank.pagination.total, 3);
}

#[tokio::test]
async fn test_search_term_is_matched_untrimmed() {
    let service = create_test_service();
    service.create_user(user_input("Adam Smith", "adam@example.com")).await.unwrap();
    service.create_user(user_input("Ada Lovelace", "lovelace@example.com")).await.unwrap();

    let page = service.list_users(search("Ada ")).await.unwrap();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.users[0].name, "Ada Lovelace");
}

#[tokio::test]
async fn test_search_ignores_address_fields() {
    let service = create_test_service();
    let mut input: CreateUserInput = user_input("Harsha Royal", "harsha@example.com");
    input.company = Some("OpenAI India".into());
    input.address = Some(address_input("11 MG Road", "Bangalore", "560001"));
    service.create_user(input).await.unwrap();

    let page = service.list_users(search("bangalore")).await.unwrap();
    assert!(page.users.is_empty());
    assert_eq!(page.pagination.total, 0);
}
