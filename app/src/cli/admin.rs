// shopkeep/src/cli/admin.rs

use super::{render, Console};
use crate::actions;
use crate::errors::Result;
use std::io::{BufRead, Write};

impl<R: BufRead, W: Write> Console<R, W> {
  pub(super) async fn admin_menu(&mut self) -> Result<()> {
    loop {
      self.say(
        "\nAdmin Menu:\n1. Display All Products\n2. Add Product\n3. Update Product Information\n\
         4. Update Stock Level\n5. Assign Category to Product\n6. Delete Product\n7. Manage Categories\n\
         8. Sales Report\n9. Popular Products Report\n10. Release Expired Reservations\n0. Back",
      )?;
      match self.prompt("Enter your choice: ")?.as_str() {
        "1" => {
          let result = actions::catalog::list_products(&self.state).await;
          self.report(result, |products| render::product_table(&products))?;
        }
        "2" => {
          let name = self.prompt("Enter the product name: ")?;
          let price = self.prompt_money("Enter the product price: ")?;
          let stock = self.prompt_i64("Enter the stock quantity: ")?;
          let category_id = self.prompt_optional_i64("Enter the category ID (blank for none): ")?;
          let result = actions::catalog::add_product(&self.state, &name, price, stock, category_id).await;
          self.report(result, |p| format!("Product added with ID {}.", p.product_id))?;
        }
        "3" => {
          let product_id = self.prompt_i64("Enter the product ID to update: ")?;
          let name = self.prompt_optional("Enter the new product name (blank to keep): ")?;
          let price = self.prompt_optional_money("Enter the new product price (blank to keep): ")?;
          let result = actions::catalog::update_product(&self.state, product_id, name.as_deref(), price).await;
          self.report(result, |p| format!("Product updated:\n{}", render::product_details(&p)))?;
        }
        "4" => {
          let product_id = self.prompt_i64("Enter the product ID to update stock: ")?;
          let quantity = self.prompt_i64("Enter the new stock quantity: ")?;
          let result = actions::catalog::set_stock(&self.state, product_id, quantity).await;
          self.report(result, |p| format!("Stock for '{}' is now {}.", p.name, p.stock_quantity))?;
        }
        "5" => {
          let product_id = self.prompt_i64("Enter the product ID: ")?;
          let category_id = self.prompt_optional_i64("Enter the category ID (blank to clear): ")?;
          let result = actions::catalog::assign_category(&self.state, product_id, category_id).await;
          self.report(result, |p| format!("Category assigned to '{}'.", p.name))?;
        }
        "6" => {
          let product_id = self.prompt_i64("Enter the product ID to delete: ")?;
          let result = actions::catalog::delete_product(&self.state, product_id).await;
          self.report(result, |_| "Product deleted successfully!".to_string())?;
        }
        "7" => self.category_menu().await?,
        "8" => {
          let result = actions::reports::sales_summary(&self.state).await;
          self.report(result, |summary| render::sales_summary(&summary))?;
        }
        "9" => {
          let result = actions::reports::popular_products(&self.state, None).await;
          self.report(result, |rows| render::popular_products(&rows))?;
        }
        "10" => {
          let minutes = self.prompt_optional_i64("Release reservations older than how many minutes (blank for default): ")?;
          let result = actions::reports::release_expired_reservations(&self.state, minutes).await;
          self.report(result, |r| {
            format!("Released {} cart line(s), returning {} unit(s) to stock.", r.lines_released, r.units_returned)
          })?;
        }
        "0" => return Ok(()),
        _ => self.say("Invalid choice. Please try again.")?,
      }
    }
  }

  async fn category_menu(&mut self) -> Result<()> {
    loop {
      self.say("\nCategories:\n1. List Categories\n2. Add Category\n3. Update Category\n4. Delete Category\n0. Back")?;
      match self.prompt("Enter your choice: ")?.as_str() {
        "1" => {
          let result = actions::catalog::list_categories(&self.state).await;
          self.report(result, |categories| render::category_table(&categories))?;
        }
        "2" => {
          let name = self.prompt("Enter the category name: ")?;
          let range = self.prompt("Enter the price range (e.g. 10-50): ")?;
          let result = actions::catalog::add_category(&self.state, &name, &range).await;
          self.report(result, |c| format!("Category added with ID {}.", c.category_id))?;
        }
        "3" => {
          let category_id = self.prompt_i64("Enter the category ID: ")?;
          let name = self.prompt_optional("Enter the new name (blank to keep): ")?;
          let range = self.prompt_optional("Enter the new price range (blank to keep): ")?;
          let result =
            actions::catalog::update_category(&self.state, category_id, name.as_deref(), range.as_deref()).await;
          self.report(result, |c| format!("Category {} updated.", c.category_id))?;
        }
        "4" => {
          let category_id = self.prompt_i64("Enter the category ID to delete: ")?;
          let result = actions::catalog::delete_category(&self.state, category_id).await;
          self.report(result, |_| "Category deleted.".to_string())?;
        }
        "0" => return Ok(()),
        _ => self.say("Invalid choice. Please try again.")?,
      }
    }
  }
}
