pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectEncryption {
    Aes256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectWrite {
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
    pub encryption: ObjectEncryption,
}

pub trait ObjectStore {
    fn put_object(&self, object: &ObjectWrite) -> Result<(), String>;
}
