//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! bocado cart add --restaurant 4 --product 12 --quantity 2
//! bocado cart notes 12 "sin cebolla"
//! bocado cart address "Av. Providencia 1234"
//! bocado cart payment efectivo
//! bocado cart show
//! bocado cart checkout
//! ```

use std::io::Write;

use clap::Subcommand;
use serde::Serialize;
use tracing::info;

use bocado_client::services::checkout::checkout;
use bocado_client::{AddOutcome, CartManager, KeyValueStore};
use bocado_core::cart::{CartState, Totals};
use bocado_core::{ProductId, RestaurantId};

use super::{CommandError, CommandResult, Context, print_json, print_line};

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart and its totals
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a product from a restaurant's menu
    Add {
        /// Restaurant whose menu holds the product
        #[arg(short, long)]
        restaurant: RestaurantId,

        /// Product to add
        #[arg(short, long)]
        product: ProductId,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Empty a cart from another restaurant without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Remove a product
    Remove { product: ProductId },
    /// Set a product's quantity (0 removes it)
    SetQuantity { product: ProductId, quantity: u32 },
    /// Set the note on a product
    Notes { product: ProductId, notes: String },
    /// Set the delivery address
    Address { address: String },
    /// Set the payment method
    Payment { method: String },
    /// Empty the cart
    Clear,
    /// Place an order for the cart as the signed-in user
    Checkout,
}

/// Run a cart command.
///
/// # Errors
///
/// Returns an error if the state file cannot be read or written, or an API
/// call fails.
pub async fn run(ctx: &Context, action: CartAction) -> CommandResult {
    let mut cart = ctx.cart()?;

    match action {
        CartAction::Show { json } => show(&cart, json)?,
        CartAction::Add {
            restaurant,
            product,
            quantity,
            yes,
        } => add(ctx, &mut cart, restaurant, product, quantity, yes).await?,
        CartAction::Remove { product } => {
            report_item_change(cart.remove_item(product)?, product, "Removed")?;
        }
        CartAction::SetQuantity { product, quantity } => {
            report_item_change(cart.update_quantity(product, quantity)?, product, "Updated")?;
        }
        CartAction::Notes { product, notes } => {
            report_item_change(cart.update_notes(product, &notes)?, product, "Updated notes of")?;
        }
        CartAction::Address { address } => {
            cart.update_delivery_address(&address)?;
            print_line(format!("Delivery address: {address}"))?;
        }
        CartAction::Payment { method } => {
            cart.update_payment_method(&method)?;
            print_line(format!("Payment method: {method}"))?;
        }
        CartAction::Clear => {
            cart.clear_cart()?;
            print_line("Cart cleared")?;
        }
        CartAction::Checkout => {
            let user = ctx.signed_in_user()?;
            let order = checkout(&ctx.api, &mut cart, user.id).await?;
            info!(order_id = %order.id, "Order placed");
            print_json(&order)?;
        }
    }

    Ok(())
}

async fn add<S: KeyValueStore>(
    ctx: &Context,
    cart: &mut CartManager<S>,
    restaurant: RestaurantId,
    product_id: ProductId,
    quantity: u32,
    yes: bool,
) -> CommandResult {
    let product = ctx
        .api
        .products_by_restaurant(restaurant)
        .await
        .into_iter()
        .find(|p| p.id == product_id)
        .ok_or_else(|| CommandError::ProductNotFound {
            product: product_id.to_string(),
            restaurant: restaurant.to_string(),
        })?;

    let outcome = match cart.add_item(&product, quantity)? {
        AddOutcome::NeedsConfirmation(pending) => {
            if yes || confirm(&pending.prompt())? {
                cart.confirm_switch(pending)?
            } else {
                return print_line("Cart left unchanged");
            }
        }
        outcome => outcome,
    };

    match outcome {
        AddOutcome::Added { quantity, .. } => {
            print_line(format!("{quantity} x {} in cart", product.name))
        }
        AddOutcome::Unchanged | AddOutcome::NeedsConfirmation(_) => print_line("Nothing added"),
    }
}

/// Ask a yes/no question on the terminal. Anything but yes is a no.
fn confirm(prompt: &str) -> std::io::Result<bool> {
    {
        let mut out = std::io::stdout().lock();
        write!(out, "{prompt} [y/N] ")?;
        out.flush()?;
    }

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn report_item_change(changed: bool, product: ProductId, verb: &str) -> CommandResult {
    if changed {
        print_line(format!("{verb} product {product}"))
    } else {
        print_line(format!("Product {product} is not in the cart"))
    }
}

#[derive(Serialize)]
struct CartView<'a> {
    #[serde(flatten)]
    state: &'a CartState,
    totals: Totals,
}

fn show<S: KeyValueStore>(cart: &CartManager<S>, json: bool) -> CommandResult {
    let totals = cart.totals();
    if json {
        return print_json(&CartView {
            state: cart.state(),
            totals,
        });
    }

    if !cart.has_items() {
        return print_line("Cart is empty");
    }

    if let Some(restaurant) = cart.restaurant() {
        let name = restaurant.name.as_deref().unwrap_or("(unnamed)");
        print_line(format!("Restaurant: {name} (#{})", restaurant.id))?;
    }
    for item in cart.items() {
        print_line(format!(
            "  {} x {} (#{}) @ {} = {}",
            item.quantity,
            item.name,
            item.id,
            item.price,
            item.line_total()
        ))?;
        if !item.notes.is_empty() {
            print_line(format!("      note: {}", item.notes))?;
        }
    }
    print_line(format!("Items:    {}", totals.total_items))?;
    print_line(format!("Subtotal: {}", totals.subtotal))?;
    print_line(format!("Shipping: {}", totals.shipping_fee))?;
    print_line(format!("Total:    {}", totals.total))?;
    print_line(format!("Delivery address: {}", cart.delivery_address()))?;
    print_line(format!("Payment method:   {}", cart.payment_method()))
}
