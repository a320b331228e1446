const HEADER_LEN: usize = 128;
const DIR_ENTRY_SIZE: usize = 28;

struct Tag {
    name: [u8; 4],
    number: u32,
    element_type: u16,
    element_size: u16,
    element_count: u32,
    payload: Vec<u8>,
    offset_override: Option<u32>,
}

/// Writes ABIF containers: 128-byte header, payloads in insertion order, then the directory.
#[derive(Default)]
pub struct AbifBuilder {
    tags: Vec<Tag>,
}

#[allow(dead_code)]
impl AbifBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(
        mut self,
        name: &[u8; 4],
        number: u32,
        element_type: u16,
        element_size: u16,
        element_count: u32,
        payload: Vec<u8>,
    ) -> Self {
        self.tags.push(Tag {
            name: *name,
            number,
            element_type,
            element_size,
            element_count,
            payload,
            offset_override: None,
        });
        self
    }

    pub fn shorts(self, name: &[u8; 4], number: u32, values: &[i16]) -> Self {
        let payload = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        self.raw(name, number, 4, 2, values.len() as u32, payload)
    }

    pub fn chars(self, name: &[u8; 4], number: u32, text: &[u8]) -> Self {
        self.raw(name, number, 2, 1, text.len() as u32, text.to_vec())
    }

    pub fn pstring(self, name: &[u8; 4], number: u32, text: &[u8]) -> Self {
        let mut payload = vec![text.len() as u8];
        payload.extend_from_slice(text);
        let n = payload.len() as u32;
        self.raw(name, number, 18, 1, n, payload)
    }

    /// Points the last added tag at `offset` instead of its payload.
    pub fn bad_offset(mut self, offset: u32) -> Self {
        if let Some(t) = self.tags.last_mut() {
            t.offset_override = Some(offset);
        }
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = Vec::new();
        let mut records = Vec::with_capacity(self.tags.len() * DIR_ENTRY_SIZE);

        for t in &self.tags {
            let field = if t.payload.len() <= 4 {
                let mut inline = [0u8; 4];
                inline[..t.payload.len()].copy_from_slice(&t.payload);
                inline
            } else {
                let off = (HEADER_LEN + data.len()) as u32;
                data.extend_from_slice(&t.payload);
                t.offset_override.unwrap_or(off).to_be_bytes()
            };
            push_record(
                &mut records,
                &t.name,
                t.number,
                t.element_type,
                t.element_size,
                t.element_count,
                t.payload.len() as u32,
                field,
            );
        }

        let dir_off = (HEADER_LEN + data.len()) as u32;

        let mut out = Vec::with_capacity(dir_off as usize + records.len());
        out.extend_from_slice(b"ABIF");
        out.extend_from_slice(&101u16.to_be_bytes());
        push_record(
            &mut out,
            b"tdir",
            1,
            1023,
            DIR_ENTRY_SIZE as u16,
            self.tags.len() as u32,
            records.len() as u32,
            dir_off.to_be_bytes(),
        );
        out.resize(HEADER_LEN, 0);
        out.extend_from_slice(&data);
        out.extend_from_slice(&records);
        out
    }
}

#[allow(clippy::too_many_arguments)]
fn push_record(
    out: &mut Vec<u8>,
    name: &[u8; 4],
    number: u32,
    element_type: u16,
    element_size: u16,
    element_count: u32,
    data_size: u32,
    field: [u8; 4],
) {
    out.extend_from_slice(name);
    out.extend_from_slice(&number.to_be_bytes());
    out.extend_from_slice(&element_type.to_be_bytes());
    out.extend_from_slice(&element_size.to_be_bytes());
    out.extend_from_slice(&element_count.to_be_bytes());
    out.extend_from_slice(&data_size.to_be_bytes());
    out.extend_from_slice(&field);
    out.extend_from_slice(&0u32.to_be_bytes());
}
