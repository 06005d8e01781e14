use super::frame::Rgb;

/// Blue (low bars) -> green -> yellow -> red (high bars), split into thirds.
pub fn gradient(num_bars: usize) -> Vec<Rgb> {
    // Fewer than three bars would leave an empty third
    let third = (num_bars / 3).max(1) as f32;

    (0..num_bars)
        .map(|i| {
            let i = i as f32;
            let (r, g, b) = if i < third {
                let g = ramp(i / third);
                (0, g, 255 - g)
            } else if i < 2.0 * third {
                (ramp((i - third) / third), 255, 0)
            } else {
                (255, 255 - ramp((i - 2.0 * third) / third), 0)
            };
            Rgb::new(clamp_channel(r), clamp_channel(g), clamp_channel(b))
        })
        .collect()
}

fn ramp(t: f32) -> i32 {
    (255.0 * t) as i32
}

fn clamp_channel(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}
