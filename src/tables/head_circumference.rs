//! Head circumference-for-age, cm, weeks 0-13. Only the girls' chart is tabulated.

use crate::models::LmsRow;

pub(crate) const HEAD_CIRCUMFERENCE_GIRLS: &[LmsRow] = &[
    (0, 1.0000, 33.8787, 0.03496, [30.3, 31.5, 32.7, 33.9, 35.1, 36.2, 37.4]),
    (1, 1.0000, 34.5529, 0.03374, [31.1, 32.2, 33.4, 34.6, 35.7, 36.9, 38.1]),
    (2, 1.0000, 35.2272, 0.03281, [31.8, 32.9, 34.1, 35.2, 36.4, 37.5, 38.7]),
    (3, 1.0000, 35.8264, 0.03208, [32.4, 33.5, 34.7, 35.8, 37.0, 38.1, 39.3]),
    (4, 1.0000, 36.3660, 0.03149, [32.9, 34.1, 35.2, 36.4, 37.5, 38.7, 39.8]),
    (5, 1.0000, 36.8599, 0.03100, [33.4, 34.6, 35.7, 36.9, 38.0, 39.1, 40.3]),
    (6, 1.0000, 37.3175, 0.03059, [33.9, 35.0, 36.2, 37.3, 38.5, 39.6, 40.7]),
    (7, 1.0000, 37.7435, 0.03024, [34.3, 35.5, 36.6, 37.7, 38.9, 40.0, 41.2]),
    (8, 1.0000, 38.1420, 0.02994, [34.7, 35.9, 37.0, 38.1, 39.3, 40.4, 41.6]),
    (9, 1.0000, 38.5167, 0.02968, [35.1, 36.2, 37.4, 38.5, 39.7, 40.8, 41.9]),
    (10, 1.0000, 38.8705, 0.02945, [35.4, 36.6, 37.7, 38.9, 40.0, 41.2, 42.3]),
    (11, 1.0000, 39.2055, 0.02925, [35.8, 36.9, 38.1, 39.2, 40.4, 41.5, 42.6]),
    (12, 1.0000, 39.5236, 0.02907, [36.1, 37.2, 38.4, 39.5, 40.7, 41.8, 43.0]),
    (13, 1.0000, 39.8262, 0.02891, [36.4, 37.5, 38.7, 39.8, 41.0, 42.1, 43.3]),
];
