//! Length/height-for-age, cm, months 0-12. L is 1 throughout.

use crate::models::LmsRow;

pub(crate) const HEIGHT_GIRLS: &[LmsRow] = &[
    (0, 1.0000, 49.1477, 0.03790, [43.6, 45.4, 47.3, 49.1, 51.0, 52.9, 54.7]),
    (1, 1.0000, 53.6872, 0.03640, [47.8, 49.8, 51.7, 53.7, 55.6, 57.6, 59.5]),
    (2, 1.0000, 57.0673, 0.03568, [51.0, 53.0, 55.0, 57.1, 59.1, 61.1, 63.2]),
    (3, 1.0000, 59.8029, 0.03520, [53.5, 55.6, 57.7, 59.8, 61.9, 64.0, 66.1]),
    (4, 1.0000, 62.0899, 0.03486, [55.6, 57.8, 59.9, 62.1, 64.3, 66.4, 68.6]),
    (5, 1.0000, 64.0301, 0.03463, [57.4, 59.6, 61.8, 64.0, 66.2, 68.5, 70.7]),
    (6, 1.0000, 65.7311, 0.03448, [58.9, 61.2, 63.5, 65.7, 68.0, 70.3, 72.5]),
    (7, 1.0000, 67.2873, 0.03441, [60.3, 62.7, 65.0, 67.3, 69.6, 71.9, 74.2]),
    (8, 1.0000, 68.7498, 0.03440, [61.7, 64.0, 66.4, 68.7, 71.1, 73.5, 75.8]),
    (9, 1.0000, 70.1435, 0.03444, [62.9, 65.3, 67.7, 70.1, 72.6, 75.0, 77.4]),
    (10, 1.0000, 71.4818, 0.03452, [64.1, 66.5, 69.0, 71.5, 73.9, 76.4, 78.9]),
    (11, 1.0000, 72.7710, 0.03464, [65.2, 67.7, 70.3, 72.8, 75.3, 77.8, 80.3]),
    (12, 1.0000, 74.0150, 0.03479, [66.3, 68.9, 71.4, 74.0, 76.6, 79.2, 81.7]),
];

pub(crate) const HEIGHT_BOYS: &[LmsRow] = &[
    (0, 1.0000, 49.8842, 0.03795, [44.2, 46.1, 48.0, 49.9, 51.8, 53.7, 55.6]),
    (1, 1.0000, 54.7244, 0.03557, [48.9, 50.8, 52.8, 54.7, 56.7, 58.6, 60.6]),
    (2, 1.0000, 58.4249, 0.03424, [52.4, 54.4, 56.4, 58.4, 60.4, 62.4, 64.4]),
    (3, 1.0000, 61.4292, 0.03328, [55.3, 57.3, 59.4, 61.4, 63.5, 65.5, 67.6]),
    (4, 1.0000, 63.8860, 0.03257, [57.6, 59.7, 61.8, 63.9, 66.0, 68.0, 70.1]),
    (5, 1.0000, 65.9026, 0.03204, [59.6, 61.7, 63.8, 65.9, 68.0, 70.1, 72.2]),
    (6, 1.0000, 67.6236, 0.03165, [61.2, 63.3, 65.5, 67.6, 69.8, 71.9, 74.0]),
    (7, 1.0000, 69.1645, 0.03139, [62.7, 64.8, 67.0, 69.2, 71.3, 73.5, 75.7]),
    (8, 1.0000, 70.5994, 0.03124, [64.0, 66.2, 68.4, 70.6, 72.8, 75.0, 77.2]),
    (9, 1.0000, 71.9687, 0.03117, [65.2, 67.5, 69.7, 72.0, 74.2, 76.5, 78.7]),
    (10, 1.0000, 73.2812, 0.03118, [66.4, 68.7, 71.0, 73.3, 75.6, 77.9, 80.1]),
    (11, 1.0000, 74.5388, 0.03125, [67.6, 69.9, 72.2, 74.5, 76.9, 79.2, 81.5]),
    (12, 1.0000, 75.7488, 0.03137, [68.6, 71.0, 73.4, 75.7, 78.1, 80.5, 82.9]),
];
