use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::config::PaymentOrderRef;
use crate::domain::errors::DomainError;
use crate::domain::order::Iteration;
use crate::domain::ports::LoadSink;
use crate::schema::{customers, orders, payments};

use super::models::{NewCustomerRow, NewOrderRow, NewPaymentRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}

// ── Sink ─────────────────────────────────────────────────────────────────────

/// Writes iterations over a single connection held for the whole run.
pub struct DieselLoadSink {
    conn: PgConnection,
    payment_order_ref: PaymentOrderRef,
}

impl DieselLoadSink {
    pub fn new(conn: PgConnection, payment_order_ref: PaymentOrderRef) -> Self {
        Self {
            conn,
            payment_order_ref,
        }
    }
}

impl LoadSink for DieselLoadSink {
    fn write(&mut self, iteration: &Iteration) -> Result<(), DomainError> {
        let payment_order_ref = self.payment_order_ref;

        self.conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Customer: first draw of an id wins, later draws are no-ops.
            diesel::insert_into(customers::table)
                .values(&NewCustomerRow {
                    id: iteration.customer.id,
                    first_name: &iteration.customer.first_name,
                    last_name: &iteration.customer.last_name,
                })
                .on_conflict(customers::id)
                .do_nothing()
                .execute(conn)?;

            // 2. Order
            let order_id: i32 = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    user_id: iteration.order.user_id,
                    order_date: iteration.order.order_date,
                    status: iteration.order.status.as_str(),
                })
                .returning(orders::id)
                .get_result(conn)?;

            // 3. Payment, only for placed orders.
            if let Some(payment) = &iteration.payment {
                let reference = match payment_order_ref {
                    PaymentOrderRef::Iteration => iteration.index,
                    PaymentOrderRef::OrderId => order_id,
                };
                diesel::insert_into(payments::table)
                    .values(&NewPaymentRow {
                        order_id: reference,
                        payment_method: payment.payment_method.as_str(),
                        amount: payment.amount,
                    })
                    .execute(conn)?;
            }

            log::debug!(
                "iteration {}: order {} for customer {} ({})",
                iteration.index,
                order_id,
                iteration.customer.id,
                iteration.order.status
            );
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use diesel::prelude::*;
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
    use testcontainers::core::{ContainerPort, WaitFor};
    use testcontainers::runners::AsyncRunner;
    use testcontainers::{ContainerAsync, GenericImage, ImageExt};

    use super::DieselLoadSink;
    use crate::config::{DbSettings, PaymentOrderRef};
    use crate::db::establish;
    use crate::domain::order::{Customer, Iteration, Order, OrderStatus, Payment, PaymentMethod};
    use crate::domain::ports::LoadSink;
    use crate::infrastructure::models::{CustomerRow, OrderRow, PaymentRow};
    use crate::schema::{customers, orders, payments};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    fn free_port() -> u16 {
        // Bind to port 0 to let the OS assign a free port, then release it.
        std::net::TcpListener::bind("127.0.0.1:0")
            .expect("bind failed")
            .local_addr()
            .expect("addr failed")
            .port()
    }

    async fn setup_db() -> (ContainerAsync<GenericImage>, DbSettings) {
        let port = free_port();
        let container = GenericImage::new("postgres", "16-alpine")
            .with_wait_for(WaitFor::message_on_stderr(
                "database system is ready to accept connections",
            ))
            .with_mapped_port(port, ContainerPort::Tcp(5432))
            .with_env_var("POSTGRES_USER", "postgres")
            .with_env_var("POSTGRES_PASSWORD", "postgres")
            .with_env_var("POSTGRES_DB", "postgres")
            .start()
            .await
            .expect("Failed to start Postgres container");
        let settings = DbSettings {
            password: Some("postgres".to_string()),
            host: Some("127.0.0.1".to_string()),
            port,
            ..DbSettings::default()
        };
        {
            let mut conn = establish(&settings).expect("Failed to connect");
            conn.run_pending_migrations(MIGRATIONS)
                .expect("Failed to run migrations");
        }
        (container, settings)
    }

    fn iteration(
        index: i32,
        customer_id: i32,
        name: (&str, &str),
        status: OrderStatus,
    ) -> Iteration {
        let payment = (status == OrderStatus::Placed).then_some(Payment {
            payment_method: PaymentMethod::GiftCard,
            amount: 1500,
        });
        Iteration {
            index,
            customer: Customer {
                id: customer_id,
                first_name: name.0.to_string(),
                last_name: name.1.to_string(),
            },
            order: Order {
                user_id: customer_id,
                order_date: NaiveDate::from_ymd_opt(2024, 5, 4)
                    .unwrap()
                    .and_hms_opt(9, 30, 0)
                    .unwrap(),
                status,
            },
            payment,
        }
    }

    #[tokio::test]
    async fn repeated_customer_id_keeps_first_row() {
        let (_container, settings) = setup_db().await;
        let mut sink = DieselLoadSink::new(
            establish(&settings).expect("connect"),
            PaymentOrderRef::Iteration,
        );

        sink.write(&iteration(1, 7, ("Ada", "Lovelace"), OrderStatus::Shipped))
            .expect("first write failed");
        sink.write(&iteration(2, 7, ("Grace", "Hopper"), OrderStatus::Completed))
            .expect("second write must not hit a key conflict");

        let mut conn = establish(&settings).expect("connect");
        let rows: Vec<CustomerRow> = customers::table
            .select(CustomerRow::as_select())
            .load(&mut conn)
            .expect("query failed");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 7);
        assert_eq!(rows[0].first_name, "Ada");
        assert_eq!(rows[0].last_name, "Lovelace");

        let order_count: i64 = orders::table.count().get_result(&mut conn).unwrap();
        assert_eq!(order_count, 2);
    }

    #[tokio::test]
    async fn placed_order_writes_payment_with_loop_counter() {
        let (_container, settings) = setup_db().await;
        let mut sink = DieselLoadSink::new(
            establish(&settings).expect("connect"),
            PaymentOrderRef::Iteration,
        );

        sink.write(&iteration(1, 3, ("A", "B"), OrderStatus::Shipped)).unwrap();
        sink.write(&iteration(2, 4, ("C", "D"), OrderStatus::Returned)).unwrap();
        sink.write(&iteration(17, 42, ("E", "F"), OrderStatus::Placed)).unwrap();

        let mut conn = establish(&settings).expect("connect");
        let placed: OrderRow = orders::table
            .filter(orders::status.eq("placed"))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .expect("placed order missing");
        assert_eq!(placed.user_id, 42);

        let rows: Vec<PaymentRow> = payments::table
            .select(PaymentRow::as_select())
            .load(&mut conn)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].order_id, 17);
        assert_ne!(rows[0].order_id, placed.id);
        assert_eq!(rows[0].payment_method, "gift_card");
        assert_eq!(rows[0].amount, 1500);
    }

    #[tokio::test]
    async fn order_id_reference_points_at_inserted_order() {
        let (_container, settings) = setup_db().await;
        let mut sink = DieselLoadSink::new(
            establish(&settings).expect("connect"),
            PaymentOrderRef::OrderId,
        );

        sink.write(&iteration(1, 5, ("A", "B"), OrderStatus::Completed)).unwrap();
        sink.write(&iteration(2, 9, ("C", "D"), OrderStatus::Placed)).unwrap();

        let mut conn = establish(&settings).expect("connect");
        let placed: OrderRow = orders::table
            .filter(orders::user_id.eq(9))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .unwrap();
        let payment: PaymentRow = payments::table
            .select(PaymentRow::as_select())
            .first(&mut conn)
            .unwrap();
        assert_eq!(payment.order_id, placed.id);
    }

    #[tokio::test]
    async fn failed_statement_rolls_back_the_iteration() {
        let (_container, settings) = setup_db().await;
        let mut conn = establish(&settings).expect("connect");
        diesel::sql_query("DROP TABLE payments")
            .execute(&mut conn)
            .unwrap();

        let mut sink = DieselLoadSink::new(
            establish(&settings).expect("connect"),
            PaymentOrderRef::Iteration,
        );
        let result = sink.write(&iteration(1, 11, ("A", "B"), OrderStatus::Placed));
        assert!(result.is_err());

        let customer_count: i64 = customers::table.count().get_result(&mut conn).unwrap();
        let order_count: i64 = orders::table.count().get_result(&mut conn).unwrap();
        assert_eq!(customer_count, 0);
        assert_eq!(order_count, 0);
    }
}
