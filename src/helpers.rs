use crate::common::{ColorRGB, ColorRGBA};

pub fn rgb(c: ColorRGBA) -> ColorRGB {
    [c[0], c[1], c[2]]
}

pub fn opaque(c: ColorRGB) -> ColorRGBA {
    [c[0], c[1], c[2], 255]
}

/// Porter-Duff "over": composite `fg` on top of `bg`, both with straight alpha.
pub fn alpha_blend(bg: ColorRGBA, fg: ColorRGBA) -> ColorRGBA {
    let fa = fg[3] as u32;
    if fa == 255 {
        return fg;
    }
    if fa == 0 {
        return bg;
    }
    let ba = bg[3] as u32;
    // Output alpha scaled by 255: fa + ba * (1 - fa)
    let out_a = fa * 255 + ba * (255 - fa);
    if out_a == 0 {
        return [0, 0, 0, 0];
    }
    let mut out: ColorRGBA = [0, 0, 0, ((out_a + 127) / 255) as u8];
    for i in 0..3 {
        let num = fg[i] as u32 * fa * 255 + bg[i] as u32 * ba * (255 - fa);
        out[i] = ((num + out_a / 2) / out_a) as u8;
    }
    out
}

/// Subtract `amount` from each color channel, saturating at zero.
pub fn darken(c: ColorRGB, amount: u8) -> ColorRGB {
    [
        c[0].saturating_sub(amount),
        c[1].saturating_sub(amount),
        c[2].saturating_sub(amount),
    ]
}

/// True if any RGB channel of `a` and `b` differs by more than `tolerance`.
pub fn differs(a: ColorRGBA, b: ColorRGBA, tolerance: u8) -> bool {
    (0..3).any(|i| a[i].abs_diff(b[i]) > tolerance)
}

pub fn is_black(c: ColorRGBA) -> bool {
    c[0] == 0 && c[1] == 0 && c[2] == 0
}
