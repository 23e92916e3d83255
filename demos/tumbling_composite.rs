use rigid_kernel::*;

/// Minimal host: spins an L-shaped composite and lets it fall under gravity.
struct Tumbler {
    bodies: BodySet,
    composite: BodyId,
    velocity: Vec2,
    spin: f64,
    gravity: Vec2,
}

impl Stepper for Tumbler {
    type Error = KernelError;

    fn update(&mut self, dt: f64, _timestamp: f64) -> Result<()> {
        self.velocity += self.gravity * dt;
        let step = self.velocity * dt;
        self.bodies.translate(self.composite, step.x, step.y)?;
        self.bodies.rotate(self.composite, self.spin * dt)
    }

    fn render(&mut self, _dt: f64) -> Result<()> {
        let body = self
            .bodies
            .get(self.composite)
            .ok_or(KernelError::UnknownBody(self.composite))?;
        println!(
            "position ({:>7.3}, {:>7.3})  rotation {:>6.3}  bound {:.2}x{:.2}",
            body.position.x,
            body.position.y,
            body.rotation,
            body.bound.width(),
            body.bound.height()
        );
        Ok(())
    }
}

fn main() -> Result<()> {
    let mut bodies = BodySet::new();
    let upright = bodies.insert(Body::rectangle(RectangleOptions::new(1.0, 3.0))?);
    let foot = bodies.insert(Body::rectangle(
        RectangleOptions::new(2.0, 1.0).with_origin(Vec2::new(1.0, 2.0)),
    )?);
    let composite = bodies.insert_composite(
        CompositeOptions::new(vec![upright, foot])
            .with_parent_props(true)
            .with_body(
                BodyOptions::default()
                    .with_mass(10.0)
                    .with_material(Material::rubber()),
            ),
    )?;

    let body = bodies
        .get(composite)
        .ok_or(KernelError::UnknownBody(composite))?;
    println!(
        "composite: mass {:.2}, area {:.2}, inertia {:.3}, centroid ({:.3}, {:.3})",
        body.mass, body.area, body.inertia, body.position.x, body.position.y
    );

    let config = StepperConfig::default().with_delta_fixed(false);
    let host = Tumbler {
        bodies,
        composite,
        velocity: Vec2::ZERO,
        spin: 1.5,
        gravity: config.gravity,
    };
    let mut stepper = TimeStepper::new(host, ManualFrames::new(), config)?;

    stepper.start(Some(30))?;
    let mut timestamp = 0.0;
    let mut frame = 0u32;
    loop {
        frame += 1;
        // Every seventh frame arrives late, as a stalled display would deliver it.
        timestamp += if frame % 7 == 0 { 50.0 } else { 16.7 };
        if !stepper.advance(timestamp)? {
            break;
        }
    }

    println!(
        "stopped after 30 ticks, last dt {:.4}s (bounds {:.4}..{:.4})",
        stepper.dt(),
        stepper.dt_min(),
        stepper.dt_max()
    );
    Ok(())
}
