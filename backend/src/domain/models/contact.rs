#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub mail: String,
}
