//! Shared test inputs.

use quarry_db_schema::{Column, FieldType, Schema, Table};

/// A declarative query touching every argument.
pub const PAYMENTS_QUERY: &str = r#"
query {
  payments(
    pagination: { page: 1, pageSize: 50 }
    distinct: true
    count: true
    sum: [paymentSum, rate]
    orderBy: [
      { field: conclusionDate, direction: DESC }
      { field: id, direction: ASC }
    ]
    where: {
      userId: { eq: 111 }
      userEmail: { eq: "someEmail@gmail.com" }
      paymentSum: { gte: 1000 }
      userName: { like: "Some%" }
      authorEmail: { eqIgnoreCase: "ignoreCaseEmail@email.com" }
    }
  ) {
    currencyCode
    paymentSum
    rate
    status
  }
}
"#;

/// SQL expected for [`PAYMENTS_QUERY`].
pub const PAYMENTS_SQL: &str = "SELECT DISTINCT currencyCode, paymentSum, rate, status, SUM(paymentSum) AS sum_paymentSum, SUM(rate) AS sum_rate, COUNT(*) AS total_count FROM payments WHERE userId = 111 AND userEmail = 'someEmail@gmail.com' AND paymentSum >= 1000 AND userName LIKE 'Some%' AND LOWER(authorEmail) = LOWER('ignoreCaseEmail@email.com') ORDER BY conclusionDate DESC, id ASC LIMIT 50 OFFSET 0";

/// `payments` with declared columns, `audit_log` with none.
pub fn make_test_schema() -> Schema {
    let payments = Table::new("payments")
        .with_column(Column::new("id", FieldType::BigInt))
        .with_column(Column::new("userId", FieldType::BigInt))
        .with_column(Column::new("userEmail", FieldType::Text))
        .with_column(Column::new("userName", FieldType::Text))
        .with_column(Column::new("authorEmail", FieldType::Text))
        .with_column(Column::new("paymentSum", FieldType::Numeric))
        .with_column(Column::new("rate", FieldType::Numeric))
        .with_column(Column::new("currencyCode", FieldType::Text))
        .with_column(Column::new("status", FieldType::Text))
        .with_column(Column::new("conclusionDate", FieldType::Timestamptz));
    Schema::new()
        .with_table(payments)
        .with_table(Table::new("audit_log"))
}
