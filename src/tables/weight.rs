//! Weight-for-age, kg, months 0-12.

use crate::models::LmsRow;

pub(crate) const WEIGHT_GIRLS: &[LmsRow] = &[
    (0, 0.3809, 3.2322, 0.14171, [2.0, 2.4, 2.8, 3.2, 3.7, 4.2, 4.8]),
    (1, 0.1714, 4.1873, 0.13724, [2.7, 3.2, 3.6, 4.2, 4.8, 5.5, 6.2]),
    (2, 0.0962, 5.1282, 0.13000, [3.4, 3.9, 4.5, 5.1, 5.8, 6.6, 7.5]),
    (3, 0.0402, 5.8458, 0.12619, [4.0, 4.5, 5.2, 5.8, 6.6, 7.5, 8.5]),
    (4, -0.0050, 6.4237, 0.12402, [4.4, 5.0, 5.7, 6.4, 7.3, 8.2, 9.3]),
    (5, -0.0430, 6.8985, 0.12274, [4.8, 5.4, 6.1, 6.9, 7.8, 8.8, 10.0]),
    (6, -0.0756, 7.2970, 0.12204, [5.1, 5.7, 6.5, 7.3, 8.2, 9.3, 10.6]),
    (7, -0.1039, 7.6422, 0.12178, [5.3, 6.0, 6.8, 7.6, 8.6, 9.8, 11.1]),
    (8, -0.1288, 7.9487, 0.12181, [5.6, 6.3, 7.0, 7.9, 9.0, 10.2, 11.6]),
    (9, -0.1507, 8.2254, 0.12199, [5.8, 6.5, 7.3, 8.2, 9.3, 10.5, 12.0]),
    (10, -0.1700, 8.4800, 0.12223, [5.9, 6.7, 7.5, 8.5, 9.6, 10.9, 12.4]),
    (11, -0.1872, 8.7192, 0.12247, [6.1, 6.9, 7.7, 8.7, 9.9, 11.2, 12.8]),
    (12, -0.2024, 8.9481, 0.12268, [6.3, 7.0, 7.9, 8.9, 10.1, 11.5, 13.1]),
];

pub(crate) const WEIGHT_BOYS: &[LmsRow] = &[
    (0, 0.3487, 3.3464, 0.14602, [2.1, 2.5, 2.9, 3.3, 3.9, 4.4, 5.0]),
    (1, 0.2297, 4.4709, 0.13395, [2.9, 3.4, 3.9, 4.5, 5.1, 5.8, 6.6]),
    (2, 0.1970, 5.5675, 0.12385, [3.8, 4.3, 4.9, 5.6, 6.3, 7.1, 8.0]),
    (3, 0.1738, 6.3762, 0.11727, [4.4, 5.0, 5.7, 6.4, 7.2, 8.0, 9.0]),
    (4, 0.1553, 7.0023, 0.11316, [4.9, 5.6, 6.2, 7.0, 7.8, 8.7, 9.7]),
    (5, 0.1395, 7.5105, 0.11080, [5.3, 6.0, 6.7, 7.5, 8.4, 9.3, 10.4]),
    (6, 0.1257, 7.9340, 0.10958, [5.7, 6.4, 7.1, 7.9, 8.8, 9.8, 10.9]),
    (7, 0.1134, 8.2970, 0.10902, [5.9, 6.7, 7.4, 8.3, 9.2, 10.3, 11.4]),
    (8, 0.1021, 8.6151, 0.10882, [6.2, 6.9, 7.7, 8.6, 9.6, 10.7, 11.9]),
    (9, 0.0917, 8.9014, 0.10881, [6.4, 7.1, 8.0, 8.9, 9.9, 11.0, 12.3]),
    (10, 0.0820, 9.1649, 0.10891, [6.6, 7.4, 8.2, 9.2, 10.2, 11.4, 12.7]),
    (11, 0.0730, 9.4122, 0.10906, [6.8, 7.6, 8.4, 9.4, 10.5, 11.7, 13.0]),
    (12, 0.0644, 9.6479, 0.10925, [6.9, 7.7, 8.6, 9.6, 10.8, 12.0, 13.3]),
];
