use modelgate_core::{build_from_text, Model};

/// Report-layer sales model with every section populated and no findings
#[allow(dead_code)]
pub const SALES: &str = r#"
name: sales
version: "1.0"
domain: commerce
owners: [data-platform]
state: approved
layer: report
entities:
  - name: customers
    kind: dimension_table
    scd_type: 2
    conformed: true
    description: Customer master
    grain: [customer_id]
    tags: [core, pii]
    fields:
      - {name: customer_id, type: integer, primary_key: true}
      - {name: email, type: varchar(255), unique: true}
      - {name: region, type: varchar(32)}
  - name: orders
    kind: fact_table
    dimension_refs: [customers, dates]
    grain: [order_id]
    fields:
      - {name: order_id, type: integer, primary_key: true}
      - {name: customer_id, type: integer, nullable: false, foreign_key: true}
      - {name: amount, type: "decimal(12,2)"}
      - {name: ordered_at, type: timestamp, nullable: false}
      - {name: note, type: text}
  - name: dates
    kind: dimension_table
    grain: [date_key]
    fields:
      - {name: date_key, type: date, primary_key: true}
relationships:
  - name: order_customer
    from: orders.customer_id
    to: customers.customer_id
    cardinality: many_to_one
indexes:
  - name: ix_orders_customer
    entity: orders
    fields: [customer_id, ordered_at]
metrics:
  - name: revenue
    entity: orders
    expression: sum(amount)
    aggregation: sum
    grain: [customer_id]
    dimensions: [customer_id]
    time_dimension: ordered_at
governance:
  classification:
    customers.email: pii
  stewards:
    commerce: alice@example.com
glossary:
  - term: Revenue
    definition: Gross order value
    related_fields: [orders.amount]
"#;

/// Replace exactly one occurrence of `from` in `text`
#[allow(dead_code)]
pub fn edit(text: &str, from: &str, to: &str) -> String {
    assert_eq!(
        text.matches(from).count(),
        1,
        "fixture edit target must be unique: {}",
        from
    );
    text.replacen(from, to, 1)
}

/// Build a model that is expected to be free of fatal errors
#[allow(dead_code)]
pub fn model(text: &str) -> Model {
    build_from_text(text).unwrap().model
}
