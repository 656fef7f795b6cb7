//! Build a small demo graph, run it for N audio blocks, print stats.
//!
//! This crate's core is a generic node graph, not a fixed effect chain, so
//! the demo exercises the host loop: a `Sine2` oscillator into a `Lowpass`,
//! fed into the group's single output channel.

use clap::Args;
use sonido_io::host_loop::{HostLoop, NoMidi};
use sonido_registry::{NodeRole, Schema, TYPE_LOWPASS, TYPE_SINE2};

#[derive(Args)]
pub struct DemoArgs {
    /// Audio blocks to process
    #[arg(long, default_value_t = 100)]
    blocks: usize,

    /// Samples per block
    #[arg(long, default_value_t = 64)]
    block_size: usize,

    /// Sample rate in Hz, used to compute the UI frame's `dt`
    #[arg(long, default_value_t = 48_000.0)]
    sample_rate: f32,

    /// Oscillator frequency in Hz
    #[arg(long, default_value_t = 440.0)]
    frequency: f32,
}

pub fn run(args: DemoArgs) -> anyhow::Result<()> {
    let mut schema = Schema::new(0, 1);

    let sine = schema.new_node(TYPE_SINE2, "Sine", NodeRole::Default);
    let lowpass = schema.new_node(TYPE_LOWPASS, "Lowpass", NodeRole::Default);
    let output = schema.group().output_node_id();

    schema
        .group_mut()
        .get_node_mut(sine)
        .expect("just created")
        .inputs_mut()[0]
        .set_constant(args.frequency);

    if !schema.connect(sine, 0, lowpass, 2) {
        anyhow::bail!("failed to connect Sine -> Lowpass");
    }
    if !schema.connect(lowpass, 0, output, 0) {
        anyhow::bail!("failed to connect Lowpass -> group output");
    }

    let mut driver = HostLoop::new(NoMidi, args.sample_rate);
    let stats = driver.run(&mut schema, args.block_size, args.blocks);

    let last_sample = schema
        .group_mut()
        .get_node_mut(output)
        .and_then(|node| node.outputs_mut().first_mut())
        .map(|port| *port.get(1).last().unwrap_or(&0.0))
        .unwrap_or(0.0);

    println!("sonido demo graph: Sine({} Hz) -> Lowpass -> output", args.frequency);
    println!("blocks processed:  {}", stats.blocks_processed);
    println!("samples processed: {}", stats.samples_processed);
    println!("ticks:              {}", stats.ticks);
    println!("last output sample: {last_sample:.6}");

    Ok(())
}
