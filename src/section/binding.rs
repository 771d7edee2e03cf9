use crate::codec::{Codec, CodecError, FormatCodec, Node};
use crate::error::BoxError;

use super::{Section, SectionData};

/// Type-erased view of a registered section
///
/// The registry only needs to move data between a [`Node`] and the typed
/// record, run the hooks and report the name, so that is all this exposes.
pub(crate) trait SectionBinding: Send + Sync {
    fn name(&self) -> String;

    fn check_shape(&self) -> Result<(), String>;

    /// Re-encode `node` and decode the bytes into the record
    fn apply(&self, codec: &FormatCodec, node: &Node) -> Result<(), CodecError>;

    /// Current record value as a node
    fn snapshot(&self, codec: &FormatCodec) -> Result<Node, CodecError>;

    fn validate(&self) -> Result<(), BoxError>;

    fn on_load(&self) -> Result<(), BoxError>;
}

impl<T: SectionData> SectionBinding for Section<T> {
    fn name(&self) -> String {
        Section::name(self)
    }

    fn check_shape(&self) -> Result<(), String> {
        Section::check_shape(self)
    }

    fn apply(&self, codec: &FormatCodec, node: &Node) -> Result<(), CodecError> {
        let bytes = codec.encode(node)?;
        let value: T = codec.decode(&bytes)?;
        *self.record().write() = value;
        Ok(())
    }

    fn snapshot(&self, codec: &FormatCodec) -> Result<Node, CodecError> {
        let value = self.record().read();
        codec.to_node(&*value)
    }

    fn validate(&self) -> Result<(), BoxError> {
        Section::validate(self)
    }

    fn on_load(&self) -> Result<(), BoxError> {
        Section::on_load(self)
    }
}
