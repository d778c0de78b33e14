// shopkeep/src/cli/customer.rs

use super::{render, Console};
use crate::actions::{self, auth::Registration};
use crate::errors::Result;
use crate::models::{ProductSearch, TrackingId, User};
use std::io::{BufRead, Write};

impl<R: BufRead, W: Write> Console<R, W> {
  pub(super) async fn customer_entry(&mut self) -> Result<()> {
    loop {
      self.say("\nCustomer Menu:\n1. Login\n2. Register\n0. Back")?;
      match self.prompt("Enter your choice: ")?.as_str() {
        "1" => {
          let username = self.prompt("Enter your username: ")?;
          let password = self.prompt("Enter your password: ")?;
          let signed_in = actions::auth::sign_in(&self.state, &username, &password).await;
          match signed_in {
            Ok(user) => {
              self.say(format!("Login successful! Welcome, {}.", user.full_name))?;
              self.customer_session(user).await?;
            }
            Err(e) => self.show_error(e)?,
          }
        }
        "2" => {
          let registration = Registration {
            username: self.prompt("Enter a username: ")?,
            password: self.prompt("Enter a password: ")?,
            full_name: self.prompt("Enter your full name: ")?,
            email: self.prompt("Enter your email: ")?,
          };
          let result = actions::auth::register(&self.state, registration).await;
          self.report(result, |user| {
            format!("Registered as '{}'. Please log in to start shopping.", user.username)
          })?;
        }
        "0" => return Ok(()),
        _ => self.say("Invalid choice. Please try again.")?,
      }
    }
  }

  /// The logged-in loop. `user` is passed to every action explicitly.
  async fn customer_session(&mut self, mut user: User) -> Result<()> {
    let user_id = user.user_id;
    loop {
      self.say(
        "\n1. View Products\n2. View Product Details\n3. Search Products\n4. Add Product to Cart\n\
         5. View Cart\n6. Remove Item from Cart\n7. Checkout\n8. Order History\n9. Account Settings\n0. Log Out",
      )?;
      match self.prompt("Enter your choice: ")?.as_str() {
        "1" => {
          let result = actions::catalog::list_products(&self.state).await;
          self.report(result, |products| render::product_table(&products))?;
        }
        "2" => {
          let product_id = self.prompt_i64("Enter the product ID to view details: ")?;
          let result = actions::catalog::product_details(&self.state, product_id).await;
          self.report(result, |product| render::product_details(&product))?;
        }
        "3" => {
          let category = self.prompt("Enter category (or leave blank for all): ")?;
          let price_range = self.prompt("Enter price range (or leave blank for all): ")?;
          let name = self.prompt("Enter part of the product name (or leave blank for all): ")?;
          let search = ProductSearch::from_inputs(&category, &price_range, &name);
          let result = actions::catalog::search_products(&self.state, &search).await;
          self.report(result, |products| render::product_table(&products))?;
        }
        "4" => {
          let product_id = self.prompt_i64("Enter the product ID to add to the cart: ")?;
          let quantity = self.prompt_i64("Enter the quantity: ")?;
          let result = actions::cart::add_to_cart(&self.state, user_id, product_id, quantity).await;
          self.report(result, |added| {
            format!(
              "Added to cart: {} (now {} in this line). {} left in stock.",
              added.line.product_name, added.line.quantity, added.remaining_stock
            )
          })?;
        }
        "5" => {
          let result = actions::cart::view_cart(&self.state, user_id).await;
          self.report(result, |cart| render::cart_table(&cart))?;
        }
        "6" => {
          let cart_id = self.prompt_i64("Enter the cart line to remove: ")?;
          let quantity = self.prompt_optional_i64("Units to remove (blank for the whole line): ")?;
          let result = actions::cart::remove_from_cart(&self.state, user_id, cart_id, quantity).await;
          self.report(result, |removed| {
            format!(
              "Returned {} unit(s) to stock; {} left on the line.",
              removed.units_returned, removed.quantity_left
            )
          })?;
        }
        "7" => {
          let hint = match &user.shipping_address {
            Some(address) => format!("Enter courier information (blank for '{}'): ", address),
            None => "Enter courier information: ".to_string(),
          };
          let courier_info = self.prompt(&hint)?;
          let result = actions::checkout::checkout(&self.state, user_id, &courier_info).await;
          self.report(result, |outcome| {
            let heading = if outcome.resumed {
              "This cart had already been ordered."
            } else {
              "Order placed successfully!"
            };
            format!("{}\nTracking ID: {}\n{}", heading, outcome.tracking_id(), outcome.receipt_text())
          })?;
        }
        "8" => self.order_history(user_id).await?,
        "9" => self.account_settings(&mut user).await?,
        "0" => {
          self.say("Logged out.")?;
          return Ok(());
        }
        _ => self.say("Invalid choice. Please try again.")?,
      }
    }
  }

  async fn order_history(&mut self, user_id: i64) -> Result<()> {
    let result = actions::checkout::order_history(&self.state, user_id).await;
    self.report(result, |orders| render::order_list(&orders))?;

    let Some(raw) = self.prompt_optional("Tracking ID to show (blank to go back): ")? else {
      return Ok(());
    };
    match raw.parse::<TrackingId>() {
      Ok(tracking_id) => {
        let result = actions::checkout::order_details(&self.state, user_id, tracking_id).await;
        self.report(result, |(order, lines)| {
          format!("{}\n{}", order.receipt_text, render::order_lines(&lines))
        })
      }
      Err(_) => self.say(format!("'{}' is not a tracking id.", raw)),
    }
  }

  async fn account_settings(&mut self, user: &mut User) -> Result<()> {
    let user_id = user.user_id;
    loop {
      self.say("\n1. Update Personal Information\n2. Change Password\n3. Set Shipping Address\n0. Back")?;
      match self.prompt("Enter your choice: ")?.as_str() {
        "1" => {
          let full_name = self.prompt("Enter your new full name: ")?;
          let email = self.prompt("Enter your new email: ")?;
          match actions::auth::update_profile(&self.state, user_id, &full_name, &email).await {
            Ok(updated) => {
              *user = updated;
              self.say("User information updated successfully!")?;
            }
            Err(e) => self.show_error(e)?,
          }
        }
        "2" => {
          let new_password = self.prompt("Enter your new password: ")?;
          let result = actions::auth::change_password(&self.state, user_id, &new_password).await;
          self.report(result, |_| "Password changed successfully!".to_string())?;
        }
        "3" => {
          let address = self.prompt("Enter your shipping address: ")?;
          match actions::auth::set_shipping_address(&self.state, user_id, &address).await {
            Ok(updated) => {
              *user = updated;
              self.say("Shipping address updated successfully!")?;
            }
            Err(e) => self.show_error(e)?,
          }
        }
        "0" => return Ok(()),
        _ => self.say("Invalid choice. Please try again.")?,
      }
    }
  }
}
