//! Human-readable dump of a decoded instrument
//!
//! Backs the `info` subcommand. Rendering is kept separate from printing so
//! the layout can be tested without capturing stdout.

use std::fmt::{self, Write};

use exs24::{Endian, Instrument, Params};

/// Entries shown per listing unless `all` is set
pub const LISTING_LIMIT: usize = 10;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct InfoOptions {
    /// List every zone, group and sample
    pub all: bool,
    /// Per-entry detail plus the Params block
    pub verbose: bool,
}

/// MIDI note name using Logic's octave numbering (note 60 is C3)
pub fn midi_note_name(note: i32) -> String {
    if !(0..=127).contains(&note) {
        return "???".to_string();
    }
    format!("{}{}", NOTE_NAMES[(note % 12) as usize], note / 12 - 2)
}

/// Render the full report
pub fn render(instrument: &Instrument, options: &InfoOptions) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, instrument, options);
    out
}

fn write_report(out: &mut String, instrument: &Instrument, options: &InfoOptions) -> fmt::Result {
    write_basic(out, instrument)?;
    writeln!(out)?;
    write_zones(out, instrument, options)?;
    writeln!(out)?;
    write_groups(out, instrument, options)?;
    writeln!(out)?;
    write_samples(out, instrument, options)?;

    if options.verbose
        && let Some(params) = &instrument.params
    {
        writeln!(out)?;
        write_params(out, params)?;
    }

    if !instrument.sequences.is_empty() {
        writeln!(out)?;
        writeln!(out, "=== Round Robin Sequences ===")?;
        writeln!(out, "  Total Sequences: {}", instrument.sequences.len())?;
        for (i, sequence) in instrument.sequences.iter().enumerate() {
            writeln!(out, "  Sequence {}: {:?}", i + 1, sequence)?;
        }
    }
    Ok(())
}

fn write_basic(out: &mut String, instrument: &Instrument) -> fmt::Result {
    let endian = match instrument.endian {
        Endian::Big => "Big Endian",
        Endian::Little => "Little Endian",
    };
    writeln!(out, "=== Basic Information ===")?;
    writeln!(out, "  Name:          {}", instrument.name)?;
    writeln!(
        out,
        "  Size:          {} bytes ({:.2} KB)",
        instrument.size,
        instrument.size as f64 / 1024.0
    )?;
    writeln!(out, "  Endianness:    {endian}")?;
    writeln!(out, "  Size Expanded: {}", instrument.size_expanded)?;
    writeln!(out, "  Zones:         {}", instrument.zones.len())?;
    writeln!(out, "  Groups:        {}", instrument.groups.len())?;
    writeln!(out, "  Samples:       {}", instrument.samples.len())
}

fn write_zones(out: &mut String, instrument: &Instrument, options: &InfoOptions) -> fmt::Result {
    let zones = &instrument.zones;
    writeln!(out, "=== Zones ===")?;
    writeln!(out, "  Total Zones: {}", zones.len())?;
    if zones.is_empty() {
        return writeln!(out, "  No zones found");
    }

    let low = zones.iter().map(|z| z.key_low).min().unwrap_or(0);
    let high = zones.iter().map(|z| z.key_high).max().unwrap_or(127);
    writeln!(
        out,
        "  Key range: {} ({}) to {} ({})",
        low,
        midi_note_name(low.into()),
        high,
        midi_note_name(high.into())
    )?;
    writeln!(out)?;

    let shown = shown(zones.len(), options);
    for (i, zone) in zones.iter().take(shown).enumerate() {
        writeln!(
            out,
            "  {:>3}. {:<25} Keys: {:>3}-{:<3} ({} to {})  Vel: {:>3}-{:<3}  Root: {:>3}",
            i + 1,
            truncate(&zone.name, 25),
            zone.key_low,
            zone.key_high,
            midi_note_name(zone.key_low.into()),
            midi_note_name(zone.key_high.into()),
            zone.vel_low,
            zone.vel_high,
            zone.key
        )?;
        if options.verbose {
            let sample = instrument
                .sample_for(zone)
                .map_or("N/A", |s| s.file_name.as_str());
            writeln!(
                out,
                "       Group: {}  Sample: {}  One-shot: {}  Loop: {}",
                zone.group_index,
                sample,
                zone.is_one_shot(),
                zone.loop_enabled()
            )?;
        }
    }
    write_more(out, zones.len(), shown, "zones")
}

fn write_groups(out: &mut String, instrument: &Instrument, options: &InfoOptions) -> fmt::Result {
    let groups = &instrument.groups;
    writeln!(out, "=== Groups ===")?;
    writeln!(out, "  Total Groups: {}", groups.len())?;
    if groups.is_empty() {
        return writeln!(out, "  No groups found");
    }
    writeln!(out)?;

    let shown = shown(groups.len(), options);
    for (i, group) in groups.iter().take(shown).enumerate() {
        let rr = if group.in_round_robin() { " [RR]" } else { "" };
        writeln!(
            out,
            "  {:>3}. {:<25} ID: {:>3}  Vol: {:>4}  Keys: {:>3}-{:<3}  SelectGrp: {:>3}{}",
            i + 1,
            truncate(&group.name, 25),
            group.id,
            group.volume,
            group.key_low,
            group.key_high,
            group.select_group,
            rr
        )?;
        if options.verbose {
            writeln!(
                out,
                "       Pan: {}  Vel: {}-{}  Polyphony: {}  SelectNumber: {}  Trigger: {}",
                group.pan,
                group.vel_low,
                group.vel_high,
                group.polyphony,
                group.select_number,
                group.trigger
            )?;
        }
    }
    write_more(out, groups.len(), shown, "groups")
}

fn write_samples(out: &mut String, instrument: &Instrument, options: &InfoOptions) -> fmt::Result {
    let samples = &instrument.samples;
    writeln!(out, "=== Samples ===")?;
    writeln!(out, "  Total Samples: {}", samples.len())?;
    if samples.is_empty() {
        return writeln!(out, "  No samples found");
    }
    writeln!(out)?;

    let shown = shown(samples.len(), options);
    for (i, sample) in samples.iter().take(shown).enumerate() {
        writeln!(out, "  {:>3}. {}", i + 1, sample.file_name)?;
        if options.verbose {
            writeln!(out, "       Name: {}", sample.name)?;
            if !sample.path.is_empty() {
                writeln!(out, "       Path: {}", sample.path)?;
            }
            writeln!(
                out,
                "       {} Hz, {} bit, {} frames",
                sample.rate, sample.bit_depth, sample.length
            )?;
        }
    }
    write_more(out, samples.len(), shown, "samples")
}

fn write_params(out: &mut String, params: &Params) -> fmt::Result {
    writeln!(out, "=== Global Parameters ===")?;
    writeln!(out, "  Output Volume:   {} dB", params.output_volume)?;
    writeln!(out, "  Pitch Bend Up:   {}", params.pitch_bend_up)?;
    writeln!(out, "  Pitch Bend Down: {}", params.pitch_bend_down)?;
    writeln!(out, "  Mono Mode:       {}", params.mono_mode)?;
    writeln!(out, "  Voices:          {}", params.voices)?;
    writeln!(out, "  Unison:          {}", params.unison)?;
    writeln!(out, "  Transpose:       {}", params.transpose)?;
    writeln!(
        out,
        "  Filter:          on={} type={} drive={}",
        params.filter_on, params.filter_type, params.filter_drive
    )?;
    writeln!(
        out,
        "  Env1 (Filter):   A={} D={} S={} R={}",
        params.env1_attack, params.env1_decay, params.env1_sustain, params.env1_release
    )?;
    writeln!(
        out,
        "  Env2 (Volume):   A={} D={} S={} R={}",
        params.env2_attack, params.env2_decay, params.env2_sustain, params.env2_release
    )?;
    writeln!(out, "  Time Curve:      {}", params.time_curve)
}

fn shown(len: usize, options: &InfoOptions) -> usize {
    if options.all {
        len
    } else {
        len.min(LISTING_LIMIT)
    }
}

fn write_more(out: &mut String, len: usize, shown: usize, what: &str) -> fmt::Result {
    if len > shown {
        writeln!(out)?;
        writeln!(out, "  ... and {} more {} (use --all)", len - shown, what)?;
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max - 3).collect();
    cut.push_str("...");
    cut
}
