/// Ids of the storage resources the encoding reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedStorage {
    pub input_id: String,
    pub output_id: String,
}
