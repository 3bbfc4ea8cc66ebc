use footscan_core::{Colors, Normals, PointCloud};
use std::fs;
use std::io::{self, BufWriter, Write as _};
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading a scan file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read scan file: {0}")]
    Io(#[from] io::Error),
    #[error("file does not start with 'ply'")]
    NotPly,
    #[error("missing end_header in PLY file")]
    MissingEndHeader,
    #[error("PLY header is not valid UTF-8")]
    HeaderNotUtf8,
    #[error("unsupported PLY format: {0}")]
    UnsupportedFormat(String),
    #[error("unsupported vertex property type: {0}")]
    UnsupportedProperty(String),
    #[error("PLY file has no vertex element")]
    MissingVertexElement,
    #[error("vertex element lacks required x, y, z properties")]
    MissingPositions,
    #[error("scan contains no points")]
    EmptyCloud,
    #[error("malformed vertex data: {0}")]
    Malformed(String),
}

/// Raised when the processed cloud cannot be written back out. Callers must
/// keep any measurements they already hold; this error only voids the file.
#[derive(Debug, Error)]
#[error("failed to write scan file: {0}")]
pub struct SaveError(#[from] pub io::Error);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
}

#[derive(Debug, Clone, Copy)]
enum PropType {
    Float,
    Double,
    Uchar,
}

impl PropType {
    fn byte_size(self) -> usize {
        match self {
            PropType::Float => 4,
            PropType::Double => 8,
            PropType::Uchar => 1,
        }
    }
}

struct PlyHeader {
    format: PlyFormat,
    vertex_count: usize,
    property_names: Vec<String>,
    property_types: Vec<PropType>,
    body_offset: usize,
}

fn parse_header(data: &[u8]) -> Result<PlyHeader, LoadError> {
    let end_marker = b"end_header\n";
    let header_end = find_bytes(data, end_marker).ok_or(LoadError::MissingEndHeader)?;
    let body_offset = header_end + end_marker.len();

    let header_text =
        std::str::from_utf8(&data[..header_end]).map_err(|_| LoadError::HeaderNotUtf8)?;

    let mut format = None;
    let mut vertex_count: usize = 0;
    let mut saw_vertex_element = false;
    let mut in_vertex_element = false;
    let mut seen_magic = false;
    let mut property_names: Vec<String> = Vec::new();
    let mut property_types: Vec<PropType> = Vec::new();

    for line in header_text.lines() {
        let line = line.trim();

        if !seen_magic {
            if line == "ply" {
                seen_magic = true;
                continue;
            }
            return Err(LoadError::NotPly);
        }

        if line.starts_with("format") {
            if line.contains("ascii") {
                format = Some(PlyFormat::Ascii);
            } else if line.contains("binary_little_endian") {
                format = Some(PlyFormat::BinaryLittleEndian);
            } else {
                return Err(LoadError::UnsupportedFormat(line.to_string()));
            }
        } else if line.starts_with("element vertex") {
            saw_vertex_element = true;
            in_vertex_element = true;
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 3 {
                return Err(LoadError::Malformed("invalid element vertex line".into()));
            }
            vertex_count = parts[2]
                .parse::<usize>()
                .map_err(|e| LoadError::Malformed(format!("invalid vertex count: {e}")))?;
        } else if line.starts_with("element") {
            in_vertex_element = false;
        } else if line.starts_with("property") && in_vertex_element {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 3 {
                let ptype = match parts[1] {
                    "float" | "float32" => PropType::Float,
                    "double" | "float64" => PropType::Double,
                    "uchar" | "uint8" => PropType::Uchar,
                    other => return Err(LoadError::UnsupportedProperty(other.to_string())),
                };
                property_types.push(ptype);
                property_names.push(parts[2].to_string());
            }
        }
    }

    if !saw_vertex_element {
        return Err(LoadError::MissingVertexElement);
    }

    let format = format.ok_or_else(|| LoadError::Malformed("format line missing".into()))?;

    Ok(PlyHeader {
        format,
        vertex_count,
        property_names,
        property_types,
        body_offset,
    })
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// One value per point per channel, extracted column-wise from the body.
struct Columns {
    values: Vec<Vec<f32>>,
}

impl Columns {
    fn take(&mut self, idx: usize) -> Vec<f32> {
        std::mem::take(&mut self.values[idx])
    }
}

fn read_columns(header: &PlyHeader, body: &[u8], wanted: &[usize]) -> Result<Columns, LoadError> {
    let n = header.vertex_count;
    let num_props = header.property_names.len();
    let mut values: Vec<Vec<f32>> = vec![Vec::new(); num_props];
    for &w in wanted {
        values[w] = Vec::with_capacity(n);
    }
    let mut is_wanted = vec![false; num_props];
    for &w in wanted {
        is_wanted[w] = true;
    }

    match header.format {
        PlyFormat::Ascii => {
            let text = std::str::from_utf8(body)
                .map_err(|_| LoadError::Malformed("PLY body not valid UTF-8".into()))?;
            let mut count = 0usize;
            for line in text.lines() {
                if count >= n {
                    break;
                }
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() < num_props {
                    return Err(LoadError::Malformed(format!(
                        "vertex line has {} fields, expected {}",
                        parts.len(),
                        num_props
                    )));
                }
                for prop in 0..num_props {
                    if !is_wanted[prop] {
                        continue;
                    }
                    let v = parts[prop]
                        .parse::<f32>()
                        .map_err(|e| LoadError::Malformed(format!("bad vertex value: {e}")))?;
                    values[prop].push(v);
                }
                count += 1;
            }
            if count < n {
                return Err(LoadError::Malformed(format!(
                    "expected {} vertices, found {}",
                    n, count
                )));
            }
        }
        PlyFormat::BinaryLittleEndian => {
            let stride: usize = header.property_types.iter().map(|t| t.byte_size()).sum();
            let needed = n * stride;
            if body.len() < needed {
                return Err(LoadError::Malformed(format!(
                    "binary body too short: need {} bytes, got {}",
                    needed,
                    body.len()
                )));
            }

            // Byte offset of each property within a vertex record
            let mut offsets = Vec::with_capacity(num_props);
            let mut off = 0usize;
            for t in &header.property_types {
                offsets.push(off);
                off += t.byte_size();
            }

            for vi in 0..n {
                let row = &body[vi * stride..(vi + 1) * stride];
                for prop in 0..num_props {
                    if !is_wanted[prop] {
                        continue;
                    }
                    let o = offsets[prop];
                    let v = match header.property_types[prop] {
                        PropType::Float => {
                            f32::from_le_bytes([row[o], row[o + 1], row[o + 2], row[o + 3]])
                        }
                        PropType::Double => f64::from_le_bytes([
                            row[o],
                            row[o + 1],
                            row[o + 2],
                            row[o + 3],
                            row[o + 4],
                            row[o + 5],
                            row[o + 6],
                            row[o + 7],
                        ]) as f32,
                        PropType::Uchar => row[o] as f32,
                    };
                    values[prop].push(v);
                }
            }
        }
    }

    Ok(Columns { values })
}

/// Rescale the three scanner color channels into `[0, 1]` using one min/max
/// pair shared across all channels combined.
///
/// The coupling is deliberate: normalizing per channel would shift the hue
/// balance the downstream viewer expects, so a single global pair is used
/// even though it looks unusual next to per-channel normalization.
fn normalize_shared(r: &mut [f32], g: &mut [f32], b: &mut [f32]) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for v in r.iter().chain(g.iter()).chain(b.iter()) {
        min = min.min(*v);
        max = max.max(*v);
    }

    if min >= 0.0 && max <= 1.0 {
        return;
    }

    let span = max - min;
    if span <= 0.0 {
        for v in r.iter_mut().chain(g.iter_mut()).chain(b.iter_mut()) {
            *v = 0.0;
        }
        return;
    }

    for v in r.iter_mut().chain(g.iter_mut()).chain(b.iter_mut()) {
        *v = (*v - min) / span;
    }
}

/// Read a scanner PLY file into a [`PointCloud`].
///
/// The vertex element must carry `x`, `y`, `z`. Normals (`nx`, `ny`, `nz`)
/// are picked up when present. Colors come from either standard
/// `red`/`green`/`blue` bytes (scaled to `[0, 1]`) or the scanner's
/// `f_dc_0`/`f_dc_1`/`f_dc_2` float channels (shared min/max rescaling, see
/// [`normalize_shared`]).
pub fn read_ply(path: impl AsRef<Path>) -> Result<PointCloud, LoadError> {
    let data = fs::read(&path)?;
    let header = parse_header(&data)?;

    let find = |name: &str| header.property_names.iter().position(|n| n == name);

    let (idx_x, idx_y, idx_z) = match (find("x"), find("y"), find("z")) {
        (Some(ix), Some(iy), Some(iz)) => (ix, iy, iz),
        _ => return Err(LoadError::MissingPositions),
    };

    let normal_idx = match (find("nx"), find("ny"), find("nz")) {
        (Some(a), Some(b), Some(c)) => Some([a, b, c]),
        _ => None,
    };

    let rgb_idx = match (find("red"), find("green"), find("blue")) {
        (Some(a), Some(b), Some(c)) => Some([a, b, c]),
        _ => None,
    };

    let fdc_idx = match (find("f_dc_0"), find("f_dc_1"), find("f_dc_2")) {
        (Some(a), Some(b), Some(c)) => Some([a, b, c]),
        _ => None,
    };

    let mut wanted = vec![idx_x, idx_y, idx_z];
    if let Some(n) = normal_idx {
        wanted.extend(n);
    }
    if let Some(c) = rgb_idx {
        wanted.extend(c);
    } else if let Some(c) = fdc_idx {
        wanted.extend(c);
    }

    let mut cols = read_columns(&header, &data[header.body_offset..], &wanted)?;

    let mut cloud = PointCloud::from_xyz(cols.take(idx_x), cols.take(idx_y), cols.take(idx_z));

    if cloud.is_empty() {
        return Err(LoadError::EmptyCloud);
    }

    if let Some([ia, ib, ic]) = normal_idx {
        cloud.normals = Some(Normals {
            nx: cols.take(ia),
            ny: cols.take(ib),
            nz: cols.take(ic),
        });
    }

    if let Some([ia, ib, ic]) = rgb_idx {
        let scale = |v: Vec<f32>| v.into_iter().map(|c| c / 255.0).collect();
        cloud.colors = Some(Colors {
            r: scale(cols.take(ia)),
            g: scale(cols.take(ib)),
            b: scale(cols.take(ic)),
        });
    } else if let Some([ia, ib, ic]) = fdc_idx {
        let mut r = cols.take(ia);
        let mut g = cols.take(ib);
        let mut b = cols.take(ic);
        normalize_shared(&mut r, &mut g, &mut b);
        cloud.colors = Some(Colors { r, g, b });
    }

    Ok(cloud)
}

fn color_byte(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn header_lines(cloud: &PointCloud, format: &str) -> String {
    let mut out = String::new();
    out.push_str("ply\n");
    out.push_str(&format!("format {} 1.0\n", format));
    out.push_str(&format!("element vertex {}\n", cloud.len()));
    out.push_str("property float x\n");
    out.push_str("property float y\n");
    out.push_str("property float z\n");

    if cloud.has_normals() {
        out.push_str("property float nx\n");
        out.push_str("property float ny\n");
        out.push_str("property float nz\n");
    }

    if cloud.has_colors() {
        out.push_str("property uchar red\n");
        out.push_str("property uchar green\n");
        out.push_str("property uchar blue\n");
    }

    out.push_str("end_header\n");
    out
}

/// Write the cloud as ASCII PLY. Colors are emitted as bytes.
pub fn write_ply(path: impl AsRef<Path>, cloud: &PointCloud) -> Result<(), SaveError> {
    let mut out = header_lines(cloud, "ascii");

    for i in 0..cloud.len() {
        out.push_str(&format!("{} {} {}", cloud.x[i], cloud.y[i], cloud.z[i]));

        if let Some(ref normals) = cloud.normals {
            out.push_str(&format!(
                " {} {} {}",
                normals.nx[i], normals.ny[i], normals.nz[i]
            ));
        }

        if let Some(ref colors) = cloud.colors {
            out.push_str(&format!(
                " {} {} {}",
                color_byte(colors.r[i]),
                color_byte(colors.g[i]),
                color_byte(colors.b[i])
            ));
        }

        out.push('\n');
    }

    fs::write(path, out)?;
    Ok(())
}

/// Write the cloud as binary_little_endian PLY.
pub fn write_ply_binary(path: impl AsRef<Path>, cloud: &PointCloud) -> Result<(), SaveError> {
    let file = fs::File::create(path)?;
    let mut w = BufWriter::new(file);

    w.write_all(header_lines(cloud, "binary_little_endian").as_bytes())?;

    for i in 0..cloud.len() {
        w.write_all(&cloud.x[i].to_le_bytes())?;
        w.write_all(&cloud.y[i].to_le_bytes())?;
        w.write_all(&cloud.z[i].to_le_bytes())?;

        if let Some(ref normals) = cloud.normals {
            w.write_all(&normals.nx[i].to_le_bytes())?;
            w.write_all(&normals.ny[i].to_le_bytes())?;
            w.write_all(&normals.nz[i].to_le_bytes())?;
        }

        if let Some(ref colors) = cloud.colors {
            w.write_all(&[
                color_byte(colors.r[i]),
                color_byte(colors.g[i]),
                color_byte(colors.b[i]),
            ])?;
        }
    }

    w.flush()?;
    Ok(())
}
