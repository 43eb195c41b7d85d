//! Waveform recording for testbench output.
//!
//! The [`WaveformRecorder`] trait abstracts the output format. [`VcdRecorder`]
//! writes IEEE 1364 Value Change Dump text, optionally through a gzip stream
//! (see [`open_recorder`]), for GTKWave, Surfer and similar viewers.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use litax_common::LogicVec;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::time::Timescale;
use crate::trace::SimSignalId;

/// On-disk trace format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveformOutputFormat {
    /// Plain VCD text.
    #[default]
    Vcd,
    /// VCD text compressed with gzip.
    VcdGz,
}

/// Sink for declared scopes, signals and their value changes.
pub trait WaveformRecorder {
    /// Declares a signal inside the currently open scope.
    fn register_signal(&mut self, id: SimSignalId, name: &str, width: u32) -> Result<(), SimError>;

    /// Opens a hierarchy level.
    fn begin_scope(&mut self, name: &str) -> Result<(), SimError>;

    /// Closes the innermost open hierarchy level.
    fn end_scope(&mut self) -> Result<(), SimError>;

    /// Records that `id` took `value` at `time` (in timescale ticks).
    fn record_change(&mut self, time: u64, id: SimSignalId, value: &LogicVec)
        -> Result<(), SimError>;

    /// Writes any trailer and completes the underlying stream.
    fn finalize(&mut self) -> Result<(), SimError>;
}

/// A byte stream that needs an explicit end, like a gzip member.
pub trait TraceWriter: Write {
    /// Completes the stream. Plain writers just flush.
    fn finish(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl TraceWriter for Vec<u8> {}

impl<W: Write> TraceWriter for BufWriter<W> {}

impl<W: Write> TraceWriter for GzEncoder<W> {
    fn finish(&mut self) -> io::Result<()> {
        self.try_finish()?;
        self.get_mut().flush()
    }
}

/// VCD recorder.
///
/// Identifier codes are printable ASCII starting at `!` (0x21). Declarations
/// are emitted as scopes and signals are registered, and `$enddefinitions`
/// is written right before the first value change. The values of the first
/// timestamp form the `$dumpvars` section, closed when time advances.
pub struct VcdRecorder<W: TraceWriter> {
    writer: W,
    timescale: Timescale,
    id_map: Vec<(SimSignalId, String, u32)>, // (signal_id, id_code, width)
    next_id: u32,
    header_written: bool,
    current_time: Option<u64>,
    in_dumpvars: bool,
    finalized: bool,
}

impl<W: TraceWriter> VcdRecorder<W> {
    /// Creates a recorder with the default `1ps` timescale.
    pub fn new(writer: W) -> Self {
        Self::with_timescale(writer, Timescale::default())
    }

    /// Creates a recorder declaring the given timescale.
    pub fn with_timescale(writer: W, timescale: Timescale) -> Self {
        Self {
            writer,
            timescale,
            id_map: Vec::new(),
            next_id: 0,
            header_written: false,
            current_time: None,
            in_dumpvars: false,
            finalized: false,
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ensure_header(&mut self) -> Result<(), SimError> {
        if self.header_written {
            return Ok(());
        }
        writeln!(self.writer, "$date")?;
        writeln!(self.writer, "  litax run")?;
        writeln!(self.writer, "$end")?;
        writeln!(self.writer, "$version")?;
        writeln!(self.writer, "  litax testbench {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(self.writer, "$end")?;
        writeln!(self.writer, "$timescale")?;
        writeln!(self.writer, "  {}", self.timescale)?;
        writeln!(self.writer, "$end")?;
        self.header_written = true;
        Ok(())
    }

    fn close_dumpvars(&mut self) -> Result<(), SimError> {
        if self.in_dumpvars {
            writeln!(self.writer, "$end")?;
            self.in_dumpvars = false;
        }
        Ok(())
    }

    /// Builds the identifier code for the `index`-th registered signal.
    fn make_id_code(index: u32) -> String {
        let mut code = String::new();
        let mut idx = index;
        loop {
            code.push((b'!' + (idx % 94) as u8) as char);
            idx /= 94;
            if idx == 0 {
                break;
            }
            idx -= 1;
        }
        code
    }

    fn format_value(value: &LogicVec, width: u32) -> String {
        if width == 1 {
            value.get(0).vcd_char().to_string()
        } else {
            let mut s = String::with_capacity(width as usize + 1);
            s.push('b');
            s.extend(value.iter_msb_first().map(|bit| bit.vcd_char()));
            s
        }
    }
}

impl<W: TraceWriter> WaveformRecorder for VcdRecorder<W> {
    fn register_signal(&mut self, id: SimSignalId, name: &str, width: u32) -> Result<(), SimError> {
        let id_code = Self::make_id_code(self.next_id);
        self.next_id += 1;

        if width == 1 {
            writeln!(self.writer, "$var wire 1 {id_code} {name} $end")?;
        } else {
            writeln!(
                self.writer,
                "$var wire {width} {id_code} {name} [{}:0] $end",
                width - 1
            )?;
        }

        self.id_map.push((id, id_code, width));
        Ok(())
    }

    fn begin_scope(&mut self, name: &str) -> Result<(), SimError> {
        self.ensure_header()?;
        writeln!(self.writer, "$scope module {name} $end")?;
        Ok(())
    }

    fn end_scope(&mut self) -> Result<(), SimError> {
        writeln!(self.writer, "$upscope $end")?;
        Ok(())
    }

    fn record_change(
        &mut self,
        time: u64,
        id: SimSignalId,
        value: &LogicVec,
    ) -> Result<(), SimError> {
        self.ensure_header()?;

        if self.current_time != Some(time) {
            if self.current_time.is_none() {
                writeln!(self.writer, "$enddefinitions $end")?;
                writeln!(self.writer, "#{time}")?;
                writeln!(self.writer, "$dumpvars")?;
                self.in_dumpvars = true;
            } else {
                self.close_dumpvars()?;
                writeln!(self.writer, "#{time}")?;
            }
            self.current_time = Some(time);
        }

        let (_, id_code, width) = self
            .id_map
            .iter()
            .find(|(sid, _, _)| *sid == id)
            .ok_or_else(|| SimError::InvalidSignalRef {
                reason: format!("unregistered VCD signal {}", id.as_raw()),
            })?;
        if value.width() != *width {
            return Err(SimError::InvalidSignalRef {
                reason: format!(
                    "signal {} declared {width} bits wide but sampled {} bits",
                    id.as_raw(),
                    value.width()
                ),
            });
        }

        let val_str = Self::format_value(value, *width);
        if *width == 1 {
            writeln!(self.writer, "{val_str}{id_code}")?;
        } else {
            writeln!(self.writer, "{val_str} {id_code}")?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SimError> {
        if self.finalized {
            return Ok(());
        }
        if self.current_time.is_none() {
            self.ensure_header()?;
            writeln!(self.writer, "$enddefinitions $end")?;
        }
        self.close_dumpvars()?;
        self.writer.finish()?;
        self.finalized = true;
        Ok(())
    }
}

/// Creates the trace file at `path` and wraps it in a recorder for `format`.
///
/// Missing parent directories are created.
pub fn open_recorder(
    path: &Path,
    format: WaveformOutputFormat,
    timescale: Timescale,
) -> Result<Box<dyn WaveformRecorder>, SimError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    Ok(match format {
        WaveformOutputFormat::Vcd => Box::new(VcdRecorder::with_timescale(writer, timescale)),
        WaveformOutputFormat::VcdGz => Box::new(VcdRecorder::with_timescale(
            GzEncoder::new(writer, Compression::default()),
            timescale,
        )),
    })
}
