use crate::model::DestinyColor;

/// CSS `rgba()` for a Destiny color, with alpha as a whole percentage
pub fn destiny_color_to_rgba(color: DestinyColor) -> String {
    let DestinyColor {
        red,
        green,
        blue,
        alpha,
    } = color;
    let alpha_percentage = (f64::from(alpha) / 255.0 * 100.0).round();
    format!("rgba({red}, {green}, {blue}, {alpha_percentage}%)")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(alpha: u8) -> DestinyColor {
        DestinyColor {
            red: 12,
            green: 34,
            blue: 56,
            alpha,
        }
    }

    #[test]
    fn test_alpha_percentages() {
        assert_eq!(destiny_color_to_rgba(color(255)), "rgba(12, 34, 56, 100%)");
        assert_eq!(destiny_color_to_rgba(color(0)), "rgba(12, 34, 56, 0%)");
        assert_eq!(destiny_color_to_rgba(color(128)), "rgba(12, 34, 56, 50%)");
        assert_eq!(destiny_color_to_rgba(color(191)), "rgba(12, 34, 56, 75%)");
    }
}
