use order_intake_core::document::OrderItem;

pub trait OrderItemStore {
    fn batch_put(&self, items: &[OrderItem]) -> Result<(), String>;
}
