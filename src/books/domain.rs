use crate::core::domain::Identifiable;

pub mod model;

pub(crate) trait Book: Identifiable {
    fn title(&self) -> &str;
    fn available_quantity(&self) -> i64;
    fn total_quantity(&self) -> i64;
    fn is_available(&self) -> bool {
        self.available_quantity() > 0
    }
}
