//! Host automation seams
//!
//! The host owns parameter records and hands out short-lived reader and
//! writer tokens. Errors on individual gets and puts are sticky: the token
//! remembers them and reports on close, as the host suite does.

use super::descriptor::{ActionDescriptor, DescriptorValue, CLASS_EXR_OPTIONS};
use super::error::HostError;
use crate::fourcc::FourCc;
use crate::options::FileAlias;

/// Read token over one parameter record
pub trait DescriptorReader {
    /// Advance to the next item, returning its key and type id
    fn next_key(&mut self) -> Option<(FourCc, FourCc)>;
    fn get_enum(&mut self) -> Result<FourCc, HostError>;
    fn get_bool(&mut self) -> Result<bool, HostError>;
    fn get_alias(&mut self) -> Result<FileAlias, HostError>;
    /// Close and dispose, returning the sticky error
    fn close(self: Box<Self>) -> Result<(), HostError>;
}

/// Write token; failed puts surface on close
pub trait DescriptorWriter {
    fn put_alias(&mut self, key: FourCc, alias: &FileAlias);
    fn put_enum(&mut self, key: FourCc, type_id: FourCc, value: FourCc);
    fn put_bool(&mut self, key: FourCc, value: bool);
    fn close(self: Box<Self>) -> Result<(), HostError>;
}

/// The host's descriptor suite for one plug-in call
pub trait ScriptingSuite {
    /// True while the host is playing back or recording an action
    fn descriptor_available(&self) -> bool;
    /// `expected` lists keys whose absence the host reports as a missing
    /// parameter on close.
    fn open_reader(&mut self, expected: &[FourCc]) -> Option<Box<dyn DescriptorReader + '_>>;
    fn open_writer(&mut self) -> Option<Box<dyn DescriptorWriter + '_>>;
    /// False when the host asks for a silent playback
    fn play_dialog(&self) -> bool;
}

/// Suite backed by in-process records
#[derive(Debug, Clone)]
pub struct RecordSuite {
    pub available: bool,
    pub show_dialog: bool,
    /// Record handed to the reader on playback
    pub playback: Option<ActionDescriptor>,
    /// Record produced by the last writer
    pub recorded: Option<ActionDescriptor>,
    /// Error the reader reports on close, if any
    pub reader_error: Option<HostError>,
    /// Error the writer reports on close, if any
    pub writer_error: Option<HostError>,
}

impl Default for RecordSuite {
    fn default() -> Self {
        Self {
            available: false,
            show_dialog: true,
            playback: None,
            recorded: None,
            reader_error: None,
            writer_error: None,
        }
    }
}

impl RecordSuite {
    /// Suite replaying `record`
    pub fn playing(record: ActionDescriptor) -> Self {
        Self {
            available: true,
            playback: Some(record),
            ..Default::default()
        }
    }

    /// Suite with an empty recording slot
    pub fn recording() -> Self {
        Self {
            available: true,
            ..Default::default()
        }
    }

    /// Decode a serialized playback record
    pub fn from_bytes(data: &[u8]) -> Result<Self, HostError> {
        ActionDescriptor::parse(data).map(Self::playing)
    }
}

impl ScriptingSuite for RecordSuite {
    fn descriptor_available(&self) -> bool {
        self.available
    }

    fn open_reader(&mut self, expected: &[FourCc]) -> Option<Box<dyn DescriptorReader + '_>> {
        let record = self.playback.as_ref()?;
        Some(Box::new(RecordReader {
            items: record.items(),
            pos: 0,
            current: None,
            unseen: expected.to_vec(),
            sticky: self.reader_error,
        }))
    }

    fn open_writer(&mut self) -> Option<Box<dyn DescriptorWriter + '_>> {
        Some(Box::new(RecordWriter {
            descriptor: ActionDescriptor::new(CLASS_EXR_OPTIONS),
            target: &mut self.recorded,
            sticky: self.writer_error,
        }))
    }

    fn play_dialog(&self) -> bool {
        self.show_dialog
    }
}

struct RecordReader<'a> {
    items: &'a [(FourCc, DescriptorValue)],
    pos: usize,
    current: Option<&'a DescriptorValue>,
    unseen: Vec<FourCc>,
    sticky: Option<HostError>,
}

impl RecordReader<'_> {
    fn fail<T>(&mut self, err: HostError) -> Result<T, HostError> {
        self.sticky.get_or_insert(err);
        Err(err)
    }
}

impl DescriptorReader for RecordReader<'_> {
    fn next_key(&mut self) -> Option<(FourCc, FourCc)> {
        let (key, value) = self.items.get(self.pos)?;
        self.pos += 1;
        self.current = Some(value);
        self.unseen.retain(|k| k != key);
        Some((*key, value.type_id()))
    }

    fn get_enum(&mut self) -> Result<FourCc, HostError> {
        match self.current {
            Some(DescriptorValue::Enum { value, .. }) => Ok(*value),
            _ => self.fail(HostError::BAD_PARAMETER),
        }
    }

    fn get_bool(&mut self) -> Result<bool, HostError> {
        match self.current {
            Some(DescriptorValue::Boolean(b)) => Ok(*b),
            _ => self.fail(HostError::BAD_PARAMETER),
        }
    }

    fn get_alias(&mut self) -> Result<FileAlias, HostError> {
        match self.current {
            Some(DescriptorValue::Alias(path)) => Ok(FileAlias::new(path.clone())),
            _ => self.fail(HostError::BAD_PARAMETER),
        }
    }

    fn close(self: Box<Self>) -> Result<(), HostError> {
        if let Some(err) = self.sticky {
            return Err(err);
        }
        if !self.unseen.is_empty() {
            return Err(HostError::MISSING_PARAMETER);
        }
        Ok(())
    }
}

struct RecordWriter<'a> {
    descriptor: ActionDescriptor,
    target: &'a mut Option<ActionDescriptor>,
    sticky: Option<HostError>,
}

impl DescriptorWriter for RecordWriter<'_> {
    fn put_alias(&mut self, key: FourCc, alias: &FileAlias) {
        self.descriptor
            .put(key, DescriptorValue::Alias(alias.as_str().to_owned()));
    }

    fn put_enum(&mut self, key: FourCc, type_id: FourCc, value: FourCc) {
        self.descriptor
            .put(key, DescriptorValue::Enum { type_id, value });
    }

    fn put_bool(&mut self, key: FourCc, value: bool) {
        self.descriptor.put(key, DescriptorValue::Boolean(value));
    }

    fn close(self: Box<Self>) -> Result<(), HostError> {
        let RecordWriter {
            descriptor,
            target,
            sticky,
        } = *self;
        *target = Some(descriptor);
        match sticky {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
