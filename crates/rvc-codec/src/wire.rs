use bytes::{Buf, BufMut};

use rvc_core::{
    Baseline, Canvas, CanvasError, CanvasProfile, Lane, StepBase, HEIGHT, K_MAX_DEFAULT,
    PIDX_SPAN, WIDTH,
};
use rvc_dsa::{OccupancySet, PlaneCell, TracePlane};

/// Container magic, first four bytes of every serialized canvas.
pub const MAGIC: [u8; 4] = *b"RVC1";
/// Single canonical format version; there is no multi-version scheme.
pub const FORMAT_VERSION: u16 = 1;

const HEADER_LEN: usize = 32;
const PAGE_ENTRY_LEN: usize = 16;
const CELL_ENTRY_LEN: usize = 20;

/// Serializes a canvas into a single self-contained buffer.
///
/// Layout, little-endian throughout: magic, format version, grid
/// dimensions, baseline selector, step base, capacity class, total
/// step count; then the occupancy segment as `(page, mask)` pairs and
/// the two plane segments as `(k, pidx, value)` triples, each prefixed
/// with its entry count. Only cells away from baseline are
/// materialized.
pub fn pack(canvas: &Canvas) -> Vec<u8> {
    let pages = canvas.occupancy().pages().count();
    let cells = canvas.plane(Lane::R).len() + canvas.plane(Lane::G).len();
    let mut out =
        Vec::with_capacity(HEADER_LEN + 24 + pages * PAGE_ENTRY_LEN + cells * CELL_ENTRY_LEN);

    out.put_slice(&MAGIC);
    out.put_u16_le(FORMAT_VERSION);
    out.put_u32_le(WIDTH);
    out.put_u32_le(HEIGHT);
    out.put_u8(match canvas.profile().baseline {
        Baseline::Zero => 0,
        Baseline::Full => 1,
    });
    out.put_u8(canvas.profile().base.value() as u8);
    out.put_u64_le(canvas.profile().k_max);
    out.put_u64_le(canvas.steps());

    out.put_u64_le(pages as u64);
    for (page, mask) in canvas.occupancy().pages() {
        out.put_u64_le(page);
        out.put_u64_le(mask);
    }

    for lane in [Lane::R, Lane::G] {
        let plane = canvas.plane(lane);
        out.put_u64_le(plane.len() as u64);
        for (k, cell) in plane.cells() {
            out.put_u64_le(k);
            out.put_u32_le(cell.pidx);
            out.put_u64_le(cell.value);
        }
    }

    out
}

fn take<'a>(buf: &mut &'a [u8], n: usize, what: &str) -> Result<&'a [u8], CanvasError> {
    if buf.remaining() < n {
        return Err(CanvasError::Malformed(format!(
            "unexpected end of container while reading {what}"
        )));
    }
    let (head, tail) = buf.split_at(n);
    *buf = tail;
    Ok(head)
}

fn take_u8(buf: &mut &[u8], what: &str) -> Result<u8, CanvasError> {
    Ok(take(buf, 1, what)?[0])
}

fn take_u16(buf: &mut &[u8], what: &str) -> Result<u16, CanvasError> {
    let mut head = take(buf, 2, what)?;
    Ok(head.get_u16_le())
}

fn take_u32(buf: &mut &[u8], what: &str) -> Result<u32, CanvasError> {
    let mut head = take(buf, 4, what)?;
    Ok(head.get_u32_le())
}

fn take_u64(buf: &mut &[u8], what: &str) -> Result<u64, CanvasError> {
    let mut head = take(buf, 8, what)?;
    Ok(head.get_u64_le())
}

/// Checks an entry count against the bytes actually left in the
/// buffer, so a tampered count can never drive allocation.
fn check_count(count: u64, entry_len: usize, buf: &[u8], what: &str) -> Result<usize, CanvasError> {
    if count > (buf.remaining() / entry_len) as u64 {
        return Err(CanvasError::Malformed(format!(
            "{what} entry count {count} exceeds the buffer"
        )));
    }
    Ok(count as usize)
}

fn read_plane(buf: &mut &[u8], what: &str) -> Result<TracePlane, CanvasError> {
    let count = take_u64(buf, what)?;
    let count = check_count(count, CELL_ENTRY_LEN, buf, what)?;
    let mut cells = Vec::with_capacity(count);
    for _ in 0..count {
        let k = take_u64(buf, what)?;
        let pidx = take_u32(buf, what)?;
        let value = take_u64(buf, what)?;
        if pidx >= PIDX_SPAN {
            return Err(CanvasError::Malformed(format!(
                "{what} cell coordinate {pidx} outside the grid"
            )));
        }
        cells.push((k, PlaneCell { pidx, value }));
    }
    TracePlane::from_cells(cells)
        .ok_or_else(|| CanvasError::Malformed(format!("duplicate depth in {what}")))
}

/// Parses a serialized container back into a canvas.
///
/// Strict by design: bad magic, dimension or version mismatches,
/// truncation, duplicate pages or depths, out-of-grid coordinates,
/// impossible counts, and trailing bytes are all rejected as
/// `Malformed`. Semantic corruption inside well-formed segments is
/// left for the decoder, which detects it as `Membership` or
/// `Convergence`.
pub fn unpack(raw: &[u8]) -> Result<Canvas, CanvasError> {
    let mut buf = raw;

    let magic = take(&mut buf, 4, "magic")?;
    if magic != MAGIC {
        return Err(CanvasError::Malformed("bad magic".into()));
    }
    let version = take_u16(&mut buf, "format version")?;
    if version != FORMAT_VERSION {
        return Err(CanvasError::Malformed(format!(
            "unsupported format version {version}"
        )));
    }

    let width = take_u32(&mut buf, "grid width")?;
    let height = take_u32(&mut buf, "grid height")?;
    if width != WIDTH || height != HEIGHT {
        return Err(CanvasError::Malformed(format!(
            "bad grid dimensions {width}x{height}"
        )));
    }

    let baseline = match take_u8(&mut buf, "baseline selector")? {
        0 => Baseline::Zero,
        1 => Baseline::Full,
        other => {
            return Err(CanvasError::Malformed(format!(
                "unknown baseline selector {other}"
            )))
        }
    };
    let base = match take_u8(&mut buf, "step base")? {
        0 => StepBase::Zero,
        1 => StepBase::One,
        other => return Err(CanvasError::Malformed(format!("unknown step base {other}"))),
    };
    let k_max = take_u64(&mut buf, "capacity class")?;
    if k_max == 0 || k_max > K_MAX_DEFAULT {
        return Err(CanvasError::Malformed(format!(
            "capacity class {k_max} out of range"
        )));
    }
    let profile = CanvasProfile {
        baseline,
        base,
        k_max,
    };

    let steps = take_u64(&mut buf, "step count")?;
    if steps > profile.capacity() {
        return Err(CanvasError::Malformed(format!(
            "step count {steps} exceeds capacity class {k_max}"
        )));
    }

    let page_count = take_u64(&mut buf, "occupancy")?;
    let page_count = check_count(page_count, PAGE_ENTRY_LEN, buf, "occupancy")?;
    let mut pairs = Vec::with_capacity(page_count);
    for _ in 0..page_count {
        let page = take_u64(&mut buf, "occupancy")?;
        let mask = take_u64(&mut buf, "occupancy")?;
        pairs.push((page, mask));
    }
    let occupancy = OccupancySet::from_pages(pairs)
        .ok_or_else(|| CanvasError::Malformed("duplicate or empty occupancy page".into()))?;

    let r = read_plane(&mut buf, "lane R")?;
    let g = read_plane(&mut buf, "lane G")?;

    if buf.has_remaining() {
        return Err(CanvasError::Malformed(format!(
            "{} trailing bytes after the G segment",
            buf.remaining()
        )));
    }

    Ok(Canvas::from_parts(profile, steps, occupancy, r, g))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;

    fn sample() -> Canvas {
        encode(b"planar trace", CanvasProfile::default()).unwrap()
    }

    #[test]
    fn pack_unpack_preserves_every_part() {
        let canvas = sample();
        let raw = pack(&canvas);
        let back = unpack(&raw).unwrap();

        assert_eq!(back.profile(), canvas.profile());
        assert_eq!(back.steps(), canvas.steps());
        assert_eq!(back.occupancy(), canvas.occupancy());
        for lane in [Lane::R, Lane::G] {
            assert_eq!(back.plane(lane), canvas.plane(lane));
        }
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut raw = pack(&sample());
        raw[0] ^= 0xFF;
        assert!(matches!(unpack(&raw), Err(CanvasError::Malformed(_))));
    }

    #[test]
    fn truncation_is_rejected_at_every_length() {
        let raw = pack(&sample());
        for len in 0..raw.len() {
            assert!(
                matches!(unpack(&raw[..len]), Err(CanvasError::Malformed(_))),
                "truncation to {len} bytes was not rejected"
            );
        }
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut raw = pack(&sample());
        raw.push(0);
        assert!(matches!(unpack(&raw), Err(CanvasError::Malformed(_))));
    }

    #[test]
    fn impossible_entry_counts_are_rejected() {
        let mut raw = pack(&sample());
        // Occupancy page count lives right after the 32-byte header.
        raw[32..40].copy_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(unpack(&raw), Err(CanvasError::Malformed(_))));
    }
}
