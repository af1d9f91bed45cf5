use facility_core::import::resolve::{Lookup, NaturalKey, ReferenceResolver};
use facility_core::import::resource::ResourceKind;
use facility_db::resolver::PgReferenceResolver;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations", fixtures("tenants"))]
async fn test_lookups_are_case_insensitive_and_tenant_scoped(pool: PgPool) {
    let mut resolver = PgReferenceResolver::new(pool);

    let client = resolver
        .lookup(&Lookup::Client { code: "acme".into() })
        .await
        .unwrap();
    assert_eq!(client, Some(1));

    let site = resolver
        .lookup(&Lookup::Site {
            client_id: 1,
            code: "HQ".into(),
        })
        .await
        .unwrap();
    assert_eq!(site, Some(2));

    // GLOBEX has a BRAND-less catalogue; ACME's brand is invisible to it.
    let foreign = resolver
        .lookup(&Lookup::TypeAssist {
            client_id: 3,
            tatype: "BRAND",
            code: "GRUNDFOS".into(),
        })
        .await
        .unwrap();
    assert_eq!(foreign, None);

    let people = resolver
        .lookup(&Lookup::People {
            client_id: 1,
            code: "emp1".into(),
        })
        .await
        .unwrap();
    assert_eq!(people, Some(2));
}

#[sqlx::test(migrations = "../../db/migrations", fixtures("tenants"))]
async fn test_lookups_are_memoised(pool: PgPool) {
    let mut resolver = PgReferenceResolver::new(pool);
    let lookup = Lookup::Asset {
        client_id: 1,
        bu_id: 2,
        code: "PUMP-01".into(),
    };
    let missing = Lookup::Asset {
        client_id: 1,
        bu_id: 2,
        code: "NOPE".into(),
    };

    for _ in 0..3 {
        assert_eq!(resolver.lookup(&lookup).await.unwrap(), Some(1));
        assert_eq!(resolver.lookup(&missing).await.unwrap(), None);
    }
    assert_eq!(resolver.cached_lookups(), 2);
}

#[sqlx::test(migrations = "../../db/migrations", fixtures("tenants"))]
async fn test_disabled_rows_do_not_resolve(pool: PgPool) {
    sqlx::query("UPDATE type_assists SET enable = false WHERE id = 4")
        .execute(&pool)
        .await
        .unwrap();
    let mut resolver = PgReferenceResolver::new(pool);
    let brand = resolver
        .lookup(&Lookup::TypeAssist {
            client_id: 1,
            tatype: "BRAND",
            code: "GRUNDFOS".into(),
        })
        .await
        .unwrap();
    assert_eq!(brand, None);
}

#[sqlx::test(migrations = "../../db/migrations", fixtures("tenants"))]
async fn test_find_existing_returns_payload_keyed_fields(pool: PgPool) {
    let mut resolver = PgReferenceResolver::new(pool);
    let record = resolver
        .find_existing(
            ResourceKind::Asset,
            &NaturalKey {
                client_id: 1,
                bu_id: Some(2),
                key: "pump-01".into(),
            },
        )
        .await
        .unwrap()
        .expect("asset exists");

    assert_eq!(record.id, 1);
    assert_eq!(record.fields["code"], "PUMP-01");
    assert_eq!(record.fields["type_id"], 1);
    assert_eq!(record.fields["location_id"], 1);

    let other_site = resolver
        .find_existing(
            ResourceKind::Asset,
            &NaturalKey {
                client_id: 3,
                bu_id: Some(4),
                key: "PUMP-01".into(),
            },
        )
        .await
        .unwrap();
    assert!(other_site.is_none());
}
