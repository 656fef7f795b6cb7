//! Host loop: the audio block driver.
//!
//! The host owns two things the core never touches directly — a UI-frame
//! clock and an audio-block clock — and drives the graph from them:
//!
//! - once per UI frame, call [`sonido_registry::Schema::tick`]
//! - once per audio block, call [`sonido_registry::Schema::process_subgraph`]
//!
//! This module also documents (but does not implement) two external
//! collaborators that stay platform back-ends out of scope for the core: the
//! MIDI event source and the audio device ring. [`MidiSource`] and
//! [`AudioRing`] are the trait contracts a real Windows/Linux MIDI/HID
//! back-end or a real cpal stream would satisfy; [`VecRing`] is a minimal
//! in-memory `AudioRing` used by the demo binary and tests, not a device
//! backend.

use sonido_registry::Schema;

/// A MIDI event as delivered to device-binding operations.
///
/// `status` is the raw 4-bit message type (8 = note-off, 9 = note-on,
/// 11 = control-change, 14 = pitch-bend); channel is carried separately
/// rather than packed into the low nibble the way raw MIDI bytes do, since
/// the host has already demultiplexed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MidiEvent {
    pub channel: u32,
    pub status: u32,
    pub data1: u32,
    pub data2: u32,
}

impl MidiEvent {
    /// Status 9 with nonzero velocity is note-on; status 9 with zero
    /// velocity is treated as note-off, same as status 8.
    pub fn is_note_on(&self) -> bool {
        self.status == 9 && self.data2 > 0
    }

    pub fn is_note_off(&self) -> bool {
        self.status == 8 || (self.status == 9 && self.data2 == 0)
    }

    /// Status 11 with `data1 == 64` is the sustain pedal; any other `data1`
    /// under status 11 is a generic knob/CC.
    pub fn is_sustain(&self) -> bool {
        self.status == 11 && self.data1 == 64
    }

    pub fn is_knob(&self) -> bool {
        self.status == 11 && self.data1 != 64
    }

    pub fn is_pitch_bend(&self) -> bool {
        self.status == 14
    }
}

/// External collaborator: a source of MIDI events polled once per UI frame.
///
/// Platform MIDI/HID back-ends (Windows/Linux) are out of scope for this
/// crate; this trait is the seam
/// a real back-end implements. The host loop calls [`MidiSource::poll`]
/// immediately before [`Schema::tick`] and hands each event to whichever
/// device-binding operation owns it — that dispatch is host-specific and not
/// modeled here.
pub trait MidiSource {
    /// Drain and return events received since the last poll.
    fn poll(&mut self) -> Vec<MidiEvent>;
}

/// A `MidiSource` that never produces events, for hosts with no MIDI input
/// bound (and for the demo binary).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMidi;

impl MidiSource for NoMidi {
    fn poll(&mut self) -> Vec<MidiEvent> {
        Vec::new()
    }
}

/// External collaborator: the double-buffered interleaved stereo ring a
/// sink `Speaker` writes at a cursor, wrapping mod `part_total_size`, and a
/// source `Mic` reads symmetrically.
///
/// A real device ring is owned by the host and backed by a live audio
/// stream (see [`crate::backend::AudioBackend`]); this trait is the seam the
/// `Speaker`/`Mic` sink/source operations would bind to. Device
/// sample-rate conversion is out of scope — the ring's rate is assumed to
/// already match the graph's.
pub trait AudioRing {
    /// Total number of interleaved stereo frames the ring holds before
    /// wrapping.
    fn part_total_size(&self) -> usize;

    /// Write interleaved stereo samples starting at `cursor`, wrapping mod
    /// `part_total_size`. Returns the cursor after the write.
    fn write_at(&mut self, cursor: usize, samples: &[f32]) -> usize;

    /// Read `count` interleaved stereo samples starting at `cursor`,
    /// wrapping mod `part_total_size`. Returns the cursor after the read.
    fn read_at(&self, cursor: usize, out: &mut [f32]) -> usize;
}

/// An in-memory [`AudioRing`] backed by a plain `Vec`, used by the demo
/// binary and tests. Not a device backend — see [`crate::cpal_backend::CpalBackend`]
/// for one of those.
#[derive(Debug, Clone)]
pub struct VecRing {
    buffer: Vec<f32>,
}

impl VecRing {
    /// Create a ring holding `part_total_size` interleaved stereo samples,
    /// initialized to silence.
    pub fn new(part_total_size: usize) -> Self {
        Self {
            buffer: vec![0.0; part_total_size],
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.buffer
    }
}

impl AudioRing for VecRing {
    fn part_total_size(&self) -> usize {
        self.buffer.len()
    }

    fn write_at(&mut self, cursor: usize, samples: &[f32]) -> usize {
        let total = self.buffer.len();
        if total == 0 {
            return 0;
        }
        let mut pos = cursor % total;
        for &sample in samples {
            self.buffer[pos] = sample;
            pos = (pos + 1) % total;
        }
        pos
    }

    fn read_at(&self, cursor: usize, out: &mut [f32]) -> usize {
        let total = self.buffer.len();
        if total == 0 {
            return 0;
        }
        let mut pos = cursor % total;
        for slot in out.iter_mut() {
            *slot = self.buffer[pos];
            pos = (pos + 1) % total;
        }
        pos
    }
}

/// Stats reported after a host loop run, for the demo CLI's "print stats"
/// output.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostLoopStats {
    pub blocks_processed: usize,
    pub samples_processed: usize,
    pub ticks: i64,
}

/// Drives a [`Schema`] the way a real host would: `tick` once per UI frame,
/// `process_subgraph` once per audio block.
///
/// This is deliberately minimal — it owns the frame/tick counters and a
/// `MidiSource`, but leaves device I/O (the `AudioRing`) to the caller, since
/// binding a `Speaker`/`Mic` node to a concrete ring is graph-specific.
#[derive(Debug)]
pub struct HostLoop<M: MidiSource> {
    midi: M,
    tick_count: i64,
    elapsed_seconds: f32,
    sample_rate: f32,
}

impl<M: MidiSource> HostLoop<M> {
    pub fn new(midi: M, sample_rate: f32) -> Self {
        Self {
            midi,
            tick_count: 0,
            elapsed_seconds: 0.0,
            sample_rate,
        }
    }

    /// Advance one UI frame: poll MIDI, then call `schema.tick`.
    ///
    /// Calling `tick` twice with the same `tick_count` must visit each
    /// node's `operation.tick` exactly once — this method owns the counter
    /// so callers can't accidentally replay a frame.
    pub fn frame(&mut self, schema: &mut Schema, dt_seconds: f32) -> Vec<MidiEvent> {
        let events = self.midi.poll();
        schema.tick(self.tick_count, self.elapsed_seconds);
        self.tick_count += 1;
        self.elapsed_seconds += dt_seconds;
        events
    }

    /// Process one audio block of `num_samples` frames.
    pub fn block(&mut self, schema: &mut Schema, num_samples: usize) {
        schema.process_subgraph(num_samples);
    }

    /// Run `blocks` audio blocks of `block_size` samples each, calling one UI
    /// frame per block (the common case for an offline demo/benchmark; a
    /// real host typically ticks at a slower rate than it processes audio).
    pub fn run(&mut self, schema: &mut Schema, block_size: usize, blocks: usize) -> HostLoopStats {
        let dt = block_size as f32 / self.sample_rate;
        for _ in 0..blocks {
            self.frame(schema, dt);
            self.block(schema, block_size);
        }
        HostLoopStats {
            blocks_processed: blocks,
            samples_processed: blocks * block_size,
            ticks: self.tick_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_on_and_off_classify_correctly() {
        let on = MidiEvent { channel: 0, status: 9, data1: 60, data2: 100 };
        let off = MidiEvent { channel: 0, status: 9, data1: 60, data2: 0 };
        let off2 = MidiEvent { channel: 0, status: 8, data1: 60, data2: 0 };
        assert!(on.is_note_on());
        assert!(off.is_note_off());
        assert!(off2.is_note_off());
    }

    #[test]
    fn sustain_and_knob_are_distinguished_by_data1() {
        let sustain = MidiEvent { channel: 0, status: 11, data1: 64, data2: 127 };
        let knob = MidiEvent { channel: 0, status: 11, data1: 7, data2: 64 };
        assert!(sustain.is_sustain());
        assert!(!sustain.is_knob());
        assert!(knob.is_knob());
        assert!(!knob.is_sustain());
    }

    #[test]
    fn vec_ring_write_then_read_round_trips() {
        let mut ring = VecRing::new(8);
        let cursor = ring.write_at(6, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(cursor, 2);
        let mut out = [0.0; 4];
        ring.read_at(6, &mut out);
        assert_eq!(out, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn no_midi_source_never_produces_events() {
        let mut source = NoMidi;
        assert!(source.poll().is_empty());
    }

    #[test]
    fn host_loop_run_reports_accurate_stats() {
        let mut schema = Schema::new(0, 0);
        let mut loop_driver = HostLoop::new(NoMidi, 48_000.0);
        let stats = loop_driver.run(&mut schema, 64, 10);
        assert_eq!(stats.blocks_processed, 10);
        assert_eq!(stats.samples_processed, 640);
        assert_eq!(stats.ticks, 10);
    }
}
