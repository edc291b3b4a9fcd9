//! Applies stock movements to the products table
//!
//! Callers pass the connection of an open transaction so a failed movement
//! rolls back the document that produced it.

use sqlx::PgConnection;

use crate::error::{AppError, AppResult};
use shared::ledger::StockMovement;

/// What to do when a movement names a product that does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingProduct {
    /// Abort the operation with `NotFound`
    Fail,
    /// Log a warning and keep going
    Warn,
}

/// Apply one movement. Returns whether the product row was found.
pub async fn apply_movement(conn: &mut PgConnection, movement: &StockMovement) -> AppResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock + $1,
            last_purchase_price = COALESCE($2, last_purchase_price),
            updated_at = NOW()
        WHERE id = $3
        "#,
    )
    .bind(movement.delta)
    .bind(movement.last_purchase_price)
    .bind(movement.product_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Apply movements in order
pub async fn apply_movements(
    conn: &mut PgConnection,
    movements: &[StockMovement],
    on_missing: MissingProduct,
) -> AppResult<()> {
    for movement in movements {
        if apply_movement(conn, movement).await? {
            tracing::debug!(
                product_id = movement.product_id,
                delta = movement.delta,
                "Stock adjusted"
            );
            continue;
        }

        match on_missing {
            MissingProduct::Fail => {
                return Err(AppError::NotFound(format!("Product {}", movement.product_id)));
            }
            MissingProduct::Warn => {
                tracing::warn!(
                    product_id = movement.product_id,
                    delta = movement.delta,
                    "Stock not adjusted: product does not exist"
                );
            }
        }
    }

    Ok(())
}
