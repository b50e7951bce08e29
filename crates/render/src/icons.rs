//! Stroke icon outlines on a 24×24 grid, drawn inside module badges.

use showcase_core::ModuleIcon;

/// One SVG element of an icon: tag name and attributes.
pub type IconShape = (&'static str, &'static [(&'static str, &'static str)]);

/// Shapes making up `icon`.
pub fn icon_shapes(icon: ModuleIcon) -> &'static [IconShape] {
    match icon {
        ModuleIcon::BarChart3 => &[
            ("path", &[("d", "M3 3v18h18")]),
            ("path", &[("d", "M18 17V9")]),
            ("path", &[("d", "M13 17V5")]),
            ("path", &[("d", "M8 17v-3")]),
        ],
        ModuleIcon::Code => &[
            ("polyline", &[("points", "16,18 22,12 16,6")]),
            ("polyline", &[("points", "8,6 2,12 8,18")]),
        ],
        ModuleIcon::Shield => &[("path", &[("d", "M12 22s8-4 8-10V5l-8-3-8 3v7c0 6 8 10 8 10z")])],
        ModuleIcon::Brain => &[
            ("path", &[("d", "M12 5a3 3 0 1 0-5.997.125 4 4 0 0 0-2.526 5.77 4 4 0 0 0 .556 6.588A4 4 0 1 0 12 18Z")]),
            ("path", &[("d", "M12 5a3 3 0 1 1 5.997.125 4 4 0 0 1 2.526 5.77 4 4 0 0 1-.556 6.588A4 4 0 1 1 12 18Z")]),
            ("path", &[("d", "M15 13a4.5 4.5 0 0 1-3-4 4.5 4.5 0 0 1-3 4")]),
        ],
        ModuleIcon::Smartphone => &[
            ("rect", &[("width", "14"), ("height", "20"), ("x", "5"), ("y", "2"), ("rx", "2")]),
            ("path", &[("d", "M12 18h.01")]),
        ],
        ModuleIcon::TrendingUp => &[
            ("polyline", &[("points", "22,7 13.5,15.5 8.5,10.5 2,17")]),
            ("polyline", &[("points", "16,7 22,7 22,13")]),
        ],
        ModuleIcon::Users => &[
            ("path", &[("d", "M16 21v-2a4 4 0 0 0-4-4H6a4 4 0 0 0-4 4v2")]),
            ("circle", &[("cx", "9"), ("cy", "7"), ("r", "4")]),
            ("path", &[("d", "M22 21v-2a4 4 0 0 0-3-3.87")]),
            ("path", &[("d", "M16 3.13a4 4 0 0 1 0 7.75")]),
        ],
        ModuleIcon::Zap => &[("polygon", &[("points", "13,2 3,14 12,14 11,22 21,10 12,10 13,2")])],
        ModuleIcon::Link => &[
            ("path", &[("d", "M10 13a5 5 0 0 0 7.54.54l3-3a5 5 0 0 0-7.07-7.07l-1.72 1.71")]),
            ("path", &[("d", "M14 11a5 5 0 0 0-7.54-.54l-3 3a5 5 0 0 0 7.07 7.07l1.71-1.71")]),
        ],
        ModuleIcon::Bot => &[
            ("path", &[("d", "M12 8V4H8")]),
            ("rect", &[("width", "16"), ("height", "12"), ("x", "4"), ("y", "8"), ("rx", "2")]),
            ("path", &[("d", "M2 14h2")]),
            ("path", &[("d", "M20 14h2")]),
            ("path", &[("d", "M15 13v2")]),
            ("path", &[("d", "M9 13v2")]),
        ],
        ModuleIcon::Circle => &[("circle", &[("cx", "12"), ("cy", "12"), ("r", "10")])],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_icon_has_shapes() {
        for icon in ModuleIcon::SELECTABLE.iter().copied().chain([ModuleIcon::Circle]) {
            assert!(!icon_shapes(icon).is_empty(), "{:?} has no shapes", icon);
        }
    }
}
