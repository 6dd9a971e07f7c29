// Shared fixtures for rankboard-core integration tests.
#![allow(dead_code)]

use rankboard_core::{Dataset, Value};

/// `[{cat:"A",val:10},{cat:"B",val:30},{cat:"A",val:5}]`
pub fn cat_val() -> Dataset {
    Dataset::new(
        vec!["cat".into(), "val".into()],
        vec![
            vec![Value::from("A"), Value::Int(10)],
            vec![Value::from("B"), Value::Int(30)],
            vec![Value::from("A"), Value::Int(5)],
        ],
    )
    .unwrap()
}

/// Small posts table: site, manager, category, pageviews, published.
pub fn posts() -> Dataset {
    let rows = [
        ("UOL", "Ana", "Esportes", 500, "2025-05-01"),
        ("R7", "Carlos", "Notícias", 1200, "2025-05-20"),
        ("UOL", "Carlos", "Esportes", 300, "2025-03-02"),
        ("Band", "Ana", "Economia", 800, "2025-05-28"),
        ("R7", "Ana", "Notícias", 100, "2024-12-31"),
        ("UOL", "Ana", "Tecnologia", 1200, "2025-05-30"),
    ];
    Dataset::new(
        vec![
            "site".into(),
            "manager".into(),
            "category".into(),
            "pageviews".into(),
            "published".into(),
        ],
        rows.iter()
            .map(|(s, m, c, p, d)| {
                vec![
                    Value::from(*s),
                    Value::from(*m),
                    Value::from(*c),
                    Value::Int(*p),
                    Value::from(*d),
                ]
            })
            .collect(),
    )
    .unwrap()
}
