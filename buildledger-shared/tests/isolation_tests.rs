/// Integration tests for country isolation
///
/// Nothing created under one country may be read, updated or deleted through
/// the other.

use buildledger_shared::auth::authorization::AuthzError;
use buildledger_shared::auth::jwt::{create_token, validate_token, Claims};
use buildledger_shared::isolation::{parse_path_country, CallerIdentity};
use buildledger_shared::models::{
    Country, CreateEmployee, CreateInventoryItem, CreatePayment, CreateProject, CreateSection,
    CreateSpending, CreateUser, Currency, PaymentType, UpdateSpending, UserRole,
};
use buildledger_shared::store::{Store, StoreConfig};
use rust_decimal_macros::dec;
use tempfile::TempDir;

const SECRET: &str = "isolation-test-secret-at-least-32-bytes!";

#[tokio::test]
async fn test_reads_never_cross_countries() {
    let dir = TempDir::new().unwrap();
    let store = Store::connect(StoreConfig::file(dir.path())).await.unwrap();
    let egypt = CallerIdentity::new("u-eg", "eg", UserRole::Admin, Country::Egypt);
    let libya = CallerIdentity::new("u-ly", "ly", UserRole::Admin, Country::Libya);
    let scoped = store.scoped(&egypt);

    let project = scoped
        .create_project(CreateProject {
            name: "Giza".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let section = scoped
        .create_section(CreateSection {
            project_id: project.id.clone(),
            name: "Base".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let spending = scoped
        .create_spending(CreateSpending {
            project_id: project.id.clone(),
            amount: dec!(5),
            ..Default::default()
        })
        .await
        .unwrap();
    let employee = scoped
        .create_employee(CreateEmployee {
            name: "Tarek".to_string(),
            monthly_salary: Some(dec!(1000)),
            ..Default::default()
        })
        .await
        .unwrap();
    let mut advance = CreatePayment::new(&employee.id, PaymentType::Advance, Currency::Egp);
    advance.amount = Some(dec!(10));
    let payment = scoped.create_payment(advance).await.unwrap();
    let item = scoped
        .create_inventory_item(CreateInventoryItem {
            name: "Tiles".to_string(),
            quantity: dec!(1),
            ..Default::default()
        })
        .await
        .unwrap();
    let user = scoped
        .create_user(CreateUser {
            username: "clerk".to_string(),
            password: "clerk-password".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let other = store.scoped(&libya);
    assert!(other.project(&project.id).await.is_none());
    assert!(other.section(&section.id).await.is_none());
    assert!(other.spending(&spending.id).await.is_none());
    assert!(other.employee(&employee.id).await.is_none());
    assert!(other.payment(&payment.id).await.is_none());
    assert!(other.inventory_item(&item.id).await.is_none());
    assert!(other.user(&user.id).await.is_none());

    assert!(other.projects(&Default::default()).await.is_empty());
    assert!(other.sections(&Default::default()).await.is_empty());
    assert!(other.spendings(&Default::default()).await.is_empty());
    assert!(other.employees(&Default::default()).await.is_empty());
    assert!(other.payments(&Default::default()).await.is_empty());
    assert!(other.inventory(&Default::default()).await.is_empty());
    assert!(other.users(&Default::default()).await.is_empty());
    assert!(other.employee_balance(&employee.id).await.is_none());
    assert!(other.project_full_expenses(&project.id).await.is_none());
    assert_eq!(other.dashboard().await.total_projects, 0);

    assert_eq!(scoped.projects(&Default::default()).await.len(), 1);
    assert_eq!(scoped.spendings(&Default::default()).await.len(), 1);
}

#[tokio::test]
async fn test_shared_spendings_file_keeps_countries_apart() {
    let dir = TempDir::new().unwrap();
    let store = Store::connect(StoreConfig::file(dir.path())).await.unwrap();
    let egypt = CallerIdentity::new("u-eg", "eg", UserRole::User, Country::Egypt);
    let libya = CallerIdentity::new("u-ly", "ly", UserRole::User, Country::Libya);

    let spending = store
        .scoped(&egypt)
        .create_spending(CreateSpending {
            project_id: "p".to_string(),
            amount: dec!(99),
            ..Default::default()
        })
        .await
        .unwrap();

    let patch = UpdateSpending {
        amount: Some(dec!(1)),
        ..Default::default()
    };
    assert!(store
        .scoped(&libya)
        .update_spending(&spending.id, patch)
        .await
        .unwrap()
        .is_none());
    assert!(!store.scoped(&libya).delete_spending(&spending.id).await.unwrap());

    let kept = store.scoped(&egypt).spending(&spending.id).await.unwrap();
    assert_eq!(kept.amount, dec!(99));
}

#[test]
fn test_token_to_caller_identity() {
    let claims = Claims::new("user-7", "laila", UserRole::Manager, Country::Libya);
    let token = create_token(&claims, SECRET).unwrap();

    let validated = validate_token(&token, SECRET).unwrap();
    let caller = CallerIdentity::from_claims(&validated);

    assert_eq!(caller.user_id(), "user-7");
    assert_eq!(caller.role(), UserRole::Manager);
    assert_eq!(caller.country(), Country::Libya);
}

#[test]
fn test_path_country_checks() {
    let caller = CallerIdentity::new("u", "n", UserRole::User, Country::Egypt);

    assert_eq!(parse_path_country("libya").unwrap(), Country::Libya);
    assert!(parse_path_country("tunisia").is_err());

    assert_eq!(caller.authorize_path_country("egypt").unwrap(), Country::Egypt);
    assert!(matches!(
        caller.authorize_path_country("libya"),
        Err(AuthzError::CountryMismatch { .. })
    ));
    assert!(matches!(
        caller.authorize_path_country("Mars"),
        Err(AuthzError::InvalidCountry(_))
    ));
}
