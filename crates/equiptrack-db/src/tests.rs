use crate::{models, Config, Error, MachineryFilter, Store};
use dotenvy::dotenv;
use std::{env, time::Duration};

pub async fn test_store() -> Store {
    dotenv().ok();
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let config = Config {
        db_url: database_url,
        max_open: 4,
        max_idle: 2,
        max_lifetime: None,
        max_idle_lifetime: None,
        timeout_for_get: Duration::from_secs(5),
    };
    crate::create(&config)
        .await
        .expect("should create the store")
}

fn unique_email(tag: &str) -> String {
    format!("{tag}-{}@example.test", uuid::Uuid::new_v4().simple())
}

fn new_machinery(code_value: String) -> models::NewMachinery {
    models::NewMachinery {
        id: String::new(),
        name: "Komatsu PC200".to_owned(),
        code: code_value,
        brand: None,
        model: None,
        serial_number: None,
        year: None,
        machinery_type: models::MachineryType::Excavator,
        status: models::MachineryStatus::Operational,
        current_location: None,
        current_project: None,
        horometer: 300.0,
        odometer: 0.0,
        operator_name: None,
        operator_id: None,
        next_maintenance_hours: Some(250.0),
        maintenance_interval_hours: 250.0,
        last_maintenance_date: None,
        acquisition_cost: 0.0,
        hourly_rate: 0.0,
        fuel_consumption_rate: 0.0,
        capacity: None,
        engine_power: None,
        weight: None,
        plate_number: None,
        is_available: true,
        is_active: true,
        tenant_id: String::new(),
    }
}

mod ids {
    #[test]
    fn generated_ids_carry_the_prefix_and_are_unique() {
        let first = crate::generate_id("mach");
        let second = crate::generate_id("mach");
        assert!(first.starts_with("mach-"), "got {first}");
        assert_eq!(first.len(), "mach-".len() + 8);
        assert_ne!(first, second, "two ids should never collide");
    }
}

mod registration {
    use super::*;

    #[tokio::test]
    #[ignore = "requires a provisioned postgres database"]
    async fn first_user_founds_a_tenant_and_becomes_admin() {
        let store = test_store().await;
        let founder = store
            .register_user(
                unique_email("founder"),
                "salt:digest".to_owned(),
                "Ana Founder".to_owned(),
                None,
            )
            .await
            .expect("registration should succeed");
        assert_eq!(founder.role, "admin");
        assert!(founder.tenant_id.starts_with("tenant-"));

        let joiner = store
            .register_user(
                unique_email("joiner"),
                "salt:digest".to_owned(),
                "Joe Joiner".to_owned(),
                Some(founder.tenant_id.clone()),
            )
            .await
            .expect("second registration should succeed");
        assert_eq!(joiner.role, "user");
        assert_eq!(joiner.tenant_id, founder.tenant_id);
    }

    #[tokio::test]
    #[ignore = "requires a provisioned postgres database"]
    async fn duplicate_email_is_a_conflict() {
        let store = test_store().await;
        let email = unique_email("dup");
        store
            .register_user(
                email.clone(),
                "salt:digest".to_owned(),
                "First In".to_owned(),
                None,
            )
            .await
            .expect("first registration should succeed");
        let second = store
            .register_user(
                email,
                "salt:digest".to_owned(),
                "Second In".to_owned(),
                None,
            )
            .await;
        assert!(matches!(second, Err(Error::Conflict(_))), "got {second:?}");
    }

    #[tokio::test]
    #[ignore = "requires a provisioned postgres database"]
    async fn joining_an_unknown_tenant_is_not_found() {
        let store = test_store().await;
        let result = store
            .register_user(
                unique_email("lost"),
                "salt:digest".to_owned(),
                "No Tenant".to_owned(),
                Some("tenant-missing".to_owned()),
            )
            .await;
        assert!(matches!(result, Err(Error::NotFound)), "got {result:?}");
    }
}

mod tenancy {
    use super::*;

    #[tokio::test]
    #[ignore = "requires a provisioned postgres database"]
    async fn customers_are_invisible_across_tenants() {
        let store = test_store().await;
        let owner = store
            .register_user(
                unique_email("owner"),
                "salt:digest".to_owned(),
                "Owner".to_owned(),
                None,
            )
            .await
            .expect("owner registration should succeed");
        let outsider = store
            .register_user(
                unique_email("outsider"),
                "salt:digest".to_owned(),
                "Outsider".to_owned(),
                None,
            )
            .await
            .expect("outsider registration should succeed");

        let created = store
            .create_customer(
                &owner.tenant_id,
                models::NewCustomer {
                    id: String::new(),
                    name: "Constructora Andes".to_owned(),
                    email: None,
                    phone: None,
                    address: None,
                    tenant_id: String::new(),
                },
            )
            .await
            .expect("customer should be created");
        assert!(created.id.starts_with("cust-"));
        assert_eq!(created.tenant_id, owner.tenant_id);

        let foreign = store
            .get_customer(&outsider.tenant_id, &created.id)
            .await
            .expect("lookup should not fail");
        assert!(foreign.is_none(), "a foreign id must read as nonexistent");

        assert!(
            !store
                .delete_customer(&outsider.tenant_id, &created.id)
                .await
                .expect("delete should not fail"),
            "a foreign id must not be deletable"
        );
        assert!(store
            .delete_customer(&owner.tenant_id, &created.id)
            .await
            .expect("delete should not fail"));
        assert!(
            !store
                .delete_customer(&owner.tenant_id, &created.id)
                .await
                .expect("repeated delete should not fail"),
            "repeated delete reports nothing removed"
        );
    }
}

mod products {
    use super::*;

    fn new_product(sku_value: String, stock_current: i32, stock_min: i32) -> models::NewProduct {
        models::NewProduct {
            id: String::new(),
            name: "Hydraulic filter".to_owned(),
            sku: sku_value,
            description: None,
            category: Some("filters".to_owned()),
            price: 49.9,
            cost: 21.5,
            stock_min,
            stock_max: 50,
            stock_current,
            tenant_id: String::new(),
        }
    }

    #[tokio::test]
    #[ignore = "requires a provisioned postgres database"]
    async fn stock_at_the_minimum_counts_as_low() {
        let store = test_store().await;
        let owner = store
            .register_user(
                unique_email("stock"),
                "salt:digest".to_owned(),
                "Stock Keeper".to_owned(),
                None,
            )
            .await
            .expect("registration should succeed");
        let sku = |tag: &str| format!("SKU-{tag}-{}", uuid::Uuid::new_v4().simple());
        let below = store
            .create_product(&owner.tenant_id, new_product(sku("below"), 5, 10))
            .await
            .expect("product should be created");
        let at_minimum = store
            .create_product(&owner.tenant_id, new_product(sku("at"), 10, 10))
            .await
            .expect("product should be created");
        let above = store
            .create_product(&owner.tenant_id, new_product(sku("above"), 11, 10))
            .await
            .expect("product should be created");

        let low = store
            .low_stock_products(&owner.tenant_id)
            .await
            .expect("low stock query should not fail");
        let low_ids: Vec<_> = low.iter().map(|p| p.id.as_str()).collect();
        assert!(low_ids.contains(&below.id.as_str()));
        assert!(low_ids.contains(&at_minimum.id.as_str()));
        assert!(!low_ids.contains(&above.id.as_str()));
    }

    #[tokio::test]
    #[ignore = "requires a provisioned postgres database"]
    async fn partial_update_touches_only_the_supplied_fields() {
        let store = test_store().await;
        let owner = store
            .register_user(
                unique_email("partial"),
                "salt:digest".to_owned(),
                "Partial Updater".to_owned(),
                None,
            )
            .await
            .expect("registration should succeed");
        let created = store
            .create_product(
                &owner.tenant_id,
                new_product(format!("SKU-{}", uuid::Uuid::new_v4().simple()), 20, 10),
            )
            .await
            .expect("product should be created");

        let renamed = store
            .update_product(
                &owner.tenant_id,
                &created.id,
                serde_json::from_str(r#"{ "name": "Air filter" }"#).expect("payload should parse"),
            )
            .await
            .expect("update should not fail")
            .expect("product should still exist");
        assert_eq!(renamed.name, "Air filter");
        assert_eq!(renamed.sku, created.sku);
        assert_eq!(renamed.price, created.price);
        assert_eq!(renamed.category.as_deref(), Some("filters"));

        let cleared = store
            .update_product(
                &owner.tenant_id,
                &created.id,
                serde_json::from_str(r#"{ "category": null }"#).expect("payload should parse"),
            )
            .await
            .expect("update should not fail")
            .expect("product should still exist");
        assert_eq!(cleared.name, "Air filter");
        assert!(cleared.category.is_none(), "explicit null must clear");
    }
}

mod machinery_lifecycle {
    use super::*;

    #[tokio::test]
    #[ignore = "requires a provisioned postgres database"]
    async fn soft_delete_hides_machinery_from_queries_and_stats() {
        let store = test_store().await;
        let owner = store
            .register_user(
                unique_email("fleet"),
                "salt:digest".to_owned(),
                "Fleet Owner".to_owned(),
                None,
            )
            .await
            .expect("registration should succeed");
        let code_value = format!("EXC-{}", uuid::Uuid::new_v4().simple());
        let created = store
            .create_machinery(&owner.tenant_id, new_machinery(code_value))
            .await
            .expect("machinery should be created");

        let stats = store
            .machinery_stats(&owner.tenant_id)
            .await
            .expect("stats should compute");
        assert_eq!(stats.total, 1);
        assert_eq!(stats.needs_maintenance, 1);
        assert_eq!(stats.total_hours, 300.0);
        let alerts = store
            .maintenance_alerts(&owner.tenant_id)
            .await
            .expect("alerts should compute");
        assert_eq!(alerts.len(), 1);

        assert!(store
            .delete_machinery(&owner.tenant_id, &created.id)
            .await
            .expect("delete should not fail"));
        assert!(store
            .get_machinery(&owner.tenant_id, &created.id)
            .await
            .expect("lookup should not fail")
            .is_none());
        assert!(store
            .list_machinery(&owner.tenant_id, 0, 100, MachineryFilter::default())
            .await
            .expect("list should not fail")
            .is_empty());
        let stats = store
            .machinery_stats(&owner.tenant_id)
            .await
            .expect("stats should compute");
        assert_eq!(stats.total, 0);
        assert_eq!(stats.total_hours, 0.0);
        assert!(
            !store
                .delete_machinery(&owner.tenant_id, &created.id)
                .await
                .expect("repeated delete should not fail"),
            "repeated delete reports nothing removed"
        );
    }
}
