mod common;

use bibliodesk::domain::validation::DATE_FORMAT;
use bibliodesk::domain::{DomainError, ValidationError};
use bibliodesk::services::{NewLibrarian, NewMember, librarian_service, member_service};
use chrono::{Duration, Local, NaiveDate};
use common::{create_member, setup_gateway};

fn asha() -> NewMember {
    NewMember {
        name: "Asha Rao".to_string(),
        email: "Asha@Example.com".to_string(),
        phone: "9876543210".to_string(),
        address: "12 MG Road, Bengaluru".to_string(),
    }
}

fn day(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).expect("valid date")
}

#[tokio::test]
async fn test_register_member_runs_for_a_year() {
    let gw = setup_gateway().await;

    let member = member_service::register_member(&gw, asha())
        .await
        .expect("registration should succeed");

    assert_eq!(member.name, "Asha Rao");
    assert_eq!(member.email, "asha@example.com");
    assert_eq!(member.join_date, Local::now().date_naive().format(DATE_FORMAT).to_string());
    assert_eq!(
        day(&member.expire_date) - day(&member.join_date),
        Duration::days(365)
    );
}

#[tokio::test]
async fn test_register_member_on_fixed_date() {
    let gw = setup_gateway().await;

    let member = member_service::register_member_on(&gw, asha(), day("2027-03-01"))
        .await
        .unwrap();
    assert_eq!(member.join_date, "2027-03-01");
    assert_eq!(member.expire_date, "2028-02-29");
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let gw = setup_gateway().await;
    member_service::register_member(&gw, asha()).await.unwrap();

    // Same address, different case
    let err = member_service::register_member(
        &gw,
        NewMember {
            name: "Asha R".to_string(),
            email: "ASHA@example.com".to_string(),
            ..asha()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DomainError::Duplicate(_)), "got {err:?}");
    assert_eq!(member_service::list_members(&gw).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_member_validation() {
    let gw = setup_gateway().await;

    let cases = [
        (
            NewMember { name: "Asha 2".to_string(), ..asha() },
            ValidationError::InvalidNameCharacters,
        ),
        (
            NewMember { email: "asha.example.com".to_string(), ..asha() },
            ValidationError::InvalidEmail,
        ),
        (
            NewMember { phone: "5876543210".to_string(), ..asha() },
            ValidationError::InvalidPhonePrefix,
        ),
        (
            NewMember { phone: "98765".to_string(), ..asha() },
            ValidationError::InvalidPhoneLength,
        ),
        (
            NewMember { address: " ".to_string(), ..asha() },
            ValidationError::EmptyAddress,
        ),
    ];

    for (input, expected) in cases {
        match member_service::register_member(&gw, input).await {
            Err(DomainError::Validation(got)) => assert_eq!(got, expected),
            other => panic!("expected {expected:?}, got {other:?}"),
        }
    }

    assert!(member_service::list_members(&gw).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_and_search_members() {
    let gw = setup_gateway().await;
    let asha_id = create_member(&gw, "Asha Rao", "asha@example.com").await;
    create_member(&gw, "Ravi Kumar", "ravi@example.com").await;

    assert_eq!(member_service::get_member(&gw, asha_id).await.unwrap().name, "Asha Rao");
    assert!(matches!(
        member_service::get_member(&gw, 404).await,
        Err(DomainError::NotFound { entity: "Member", id: 404 })
    ));

    let by_name = member_service::search_members(&gw, "rao").await.unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, asha_id);

    let by_email = member_service::search_members(&gw, "example.com").await.unwrap();
    assert_eq!(
        by_email.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
        vec!["Asha Rao", "Ravi Kumar"]
    );

    assert!(member_service::search_members(&gw, "nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_register_librarian() {
    let gw = setup_gateway().await;
    let today = day("2026-10-15");

    let meera = librarian_service::register_librarian_on(
        &gw,
        NewLibrarian {
            name: "Meera Iyer".to_string(),
            email: "Meera@Library.example".to_string(),
            hire_date: "2020-01-06".to_string(),
        },
        today,
    )
    .await
    .unwrap();
    assert_eq!(meera.email, "meera@library.example");
    assert_eq!(meera.hire_date, "2020-01-06");

    // Hired today is fine, tomorrow is not
    librarian_service::register_librarian_on(
        &gw,
        NewLibrarian {
            name: "Ravi Kumar".to_string(),
            email: "ravi@library.example".to_string(),
            hire_date: "2026-10-15".to_string(),
        },
        today,
    )
    .await
    .unwrap();

    let err = librarian_service::register_librarian_on(
        &gw,
        NewLibrarian {
            name: "Kiran Das".to_string(),
            email: "kiran@library.example".to_string(),
            hire_date: "2026-10-16".to_string(),
        },
        today,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationError::HireDateInFuture)));

    let err = librarian_service::register_librarian_on(
        &gw,
        NewLibrarian {
            name: "Kiran Das".to_string(),
            email: "kiran@library.example".to_string(),
            hire_date: "16-10-2026".to_string(),
        },
        today,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationError::InvalidDate(_))));

    let names: Vec<String> = librarian_service::list_librarians(&gw)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.name)
        .collect();
    assert_eq!(names, vec!["Meera Iyer", "Ravi Kumar"]);
}

#[tokio::test]
async fn test_duplicate_librarian_email() {
    let gw = setup_gateway().await;
    let input = NewLibrarian {
        name: "Meera Iyer".to_string(),
        email: "meera@library.example".to_string(),
        hire_date: "2020-01-06".to_string(),
    };

    librarian_service::register_librarian(&gw, input.clone()).await.unwrap();
    let err = librarian_service::register_librarian(&gw, input).await.unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));
}
