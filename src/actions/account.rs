use super::base;
use serde_json::{Map, Value};

/// Parameters for `account-info`: which statistics to include.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountInfoParams {
    balance: bool,
    storage: bool,
    albums: bool,
    images: bool,
}

impl AccountInfoParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include balance information.
    pub fn balance(mut self, include: bool) -> Self {
        self.balance = include;
        self
    }

    /// Include storage capacity and usage.
    pub fn storage(mut self, include: bool) -> Self {
        self.storage = include;
        self
    }

    /// Include the number of albums.
    pub fn albums(mut self, include: bool) -> Self {
        self.albums = include;
        self
    }

    /// Include the number of images.
    pub fn images(mut self, include: bool) -> Self {
        self.images = include;
        self
    }

    pub(crate) fn into_params(self) -> Map<String, Value> {
        let mut params = base("account-info");
        params.insert("balance".into(), Value::Bool(self.balance));
        params.insert("storage".into(), Value::Bool(self.storage));
        params.insert("albums".into(), Value::Bool(self.albums));
        params.insert("images".into(), Value::Bool(self.images));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn all_flags_are_always_present() {
        let params = AccountInfoParams::new().balance(true).into_params();
        assert_eq!(params["action"], json!("account-info"));
        assert_eq!(params["balance"], json!(true));
        assert_eq!(params["storage"], json!(false));
        assert_eq!(params["albums"], json!(false));
        assert_eq!(params["images"], json!(false));
    }
}
