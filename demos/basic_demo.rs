//! Basic demonstration of the orrery simulation.
//!
//! Run with: cargo run --example basic_demo

use orrery_sim::{SimError, SimWorld};

fn main() -> Result<(), SimError> {
    env_logger::init();

    println!("=== Orrery Sim - Inner Solar System Demo ===\n");

    let mut sim = SimWorld::new_solar_system()?;

    println!("Initial state:");
    print_snapshot(&mut sim);

    // Crank the step up to 1000 simulated seconds per tick and run a month.
    sim.set_step_index(13);
    println!(
        "\nRunning 2592 ticks at {} s/tick (~30 simulated days)...\n",
        sim.current_step()
    );
    for tick in 0..2592 {
        sim.step_once();

        if (tick + 1) % 864 == 0 {
            let t = sim.elapsed_breakdown();
            println!(
                "--- Tick {} ({}y {}d {}h {}m {}s) ---",
                sim.current_tick(),
                t.years,
                t.days,
                t.hours,
                t.minutes,
                t.seconds
            );
            print_snapshot(&mut sim);
        }
    }

    // Drill into mars, then back out to the full system view.
    println!("\n--- Focusing mars ---\n");
    sim.request_focus("mars")?;
    println!("focused: {:?}", sim.focused_name());
    println!("moons of mars: {:?}", sim.children_of("mars")?);
    sim.reset_focus();

    // Slow back down before handing control to an interactive loop.
    sim.shift_step_index(-10);
    println!("\nstep size restored to {} s/tick", sim.current_step());

    println!("\n=== Final State (JSON) ===\n");
    match sim.snapshot().to_json_pretty() {
        Ok(json) => println!("{json}"),
        Err(err) => println!("snapshot serialization failed: {err}"),
    }
    Ok(())
}

fn print_snapshot(sim: &mut SimWorld) {
    let snapshot = sim.snapshot();

    for body in &snapshot.bodies {
        println!(
            "    {:8} [{}]: pos=({:+.3e}, {:+.3e}) m  v={:.1} m/s  dist={:.3e} m  moons={:?}",
            body.name, body.role, body.x, body.y, body.speed, body.distance_from_central, body.moons
        );
    }
}
