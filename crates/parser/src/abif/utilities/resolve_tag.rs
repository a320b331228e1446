use log::debug;

use crate::{
    abif::utilities::{
        decode_value::{DecodedValue, decode_value},
        parse_directory::{Directory, TagKey},
    },
    error::{AbifError, Result},
};

const DATA: &[u8; 4] = b"DATA";

pub const CHANNEL_G_ALIASES: &[TagKey] = &[TagKey::new(DATA, 9), TagKey::new(DATA, 1)];
pub const CHANNEL_A_ALIASES: &[TagKey] = &[TagKey::new(DATA, 10), TagKey::new(DATA, 2)];
pub const CHANNEL_T_ALIASES: &[TagKey] = &[TagKey::new(DATA, 11), TagKey::new(DATA, 3)];
pub const CHANNEL_C_ALIASES: &[TagKey] = &[TagKey::new(DATA, 12), TagKey::new(DATA, 4)];
pub const BASE_CALL_ALIASES: &[TagKey] = &[TagKey::new(b"PBAS", 2), TagKey::new(b"PBAS", 1)];
pub const BASE_POSITION_ALIASES: &[TagKey] =
    &[TagKey::new(b"PLOC", 2), TagKey::new(b"PLOC", 1)];
pub const BASE_QUALITY_ALIASES: &[TagKey] = &[TagKey::new(b"PCON", 2), TagKey::new(b"PCON", 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceField {
    ChannelG,
    ChannelA,
    ChannelT,
    ChannelC,
    BaseCalls,
    BasePositions,
    BaseQualities,
}

impl TraceField {
    pub const CHANNELS: [TraceField; 4] = [
        TraceField::ChannelG,
        TraceField::ChannelA,
        TraceField::ChannelT,
        TraceField::ChannelC,
    ];

    /// Highest priority first.
    #[inline]
    pub fn aliases(self) -> &'static [TagKey] {
        match self {
            TraceField::ChannelG => CHANNEL_G_ALIASES,
            TraceField::ChannelA => CHANNEL_A_ALIASES,
            TraceField::ChannelT => CHANNEL_T_ALIASES,
            TraceField::ChannelC => CHANNEL_C_ALIASES,
            TraceField::BaseCalls => BASE_CALL_ALIASES,
            TraceField::BasePositions => BASE_POSITION_ALIASES,
            TraceField::BaseQualities => BASE_QUALITY_ALIASES,
        }
    }

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            TraceField::ChannelG => "channel G",
            TraceField::ChannelA => "channel A",
            TraceField::ChannelT => "channel T",
            TraceField::ChannelC => "channel C",
            TraceField::BaseCalls => "base calls",
            TraceField::BasePositions => "base positions",
            TraceField::BaseQualities => "base qualities",
        }
    }
}

/// First alias that is present and decodes to something non-empty.
pub fn lookup(
    directory: &Directory,
    bytes: &[u8],
    field: TraceField,
) -> Result<(TagKey, DecodedValue)> {
    for &key in field.aliases() {
        let Some(entry) = directory.get(key) else {
            continue;
        };
        let value = decode_value(bytes, entry);
        if value.is_empty() {
            debug!("{}: {key} present but empty, trying next alias", field.name());
            continue;
        }
        return Ok((key, value));
    }

    Err(AbifError::EmptyRequiredField(field.name()))
}

pub fn resolve(directory: &Directory, bytes: &[u8], field: TraceField) -> DecodedValue {
    match lookup(directory, bytes, field) {
        Ok((key, value)) => {
            debug!("{}: using {key} ({} elements)", field.name(), value.len());
            value
        }
        Err(e) => {
            debug!("{e}");
            DecodedValue::Empty
        }
    }
}
