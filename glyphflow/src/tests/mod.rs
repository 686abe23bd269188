// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod test_analysis;
mod test_bidi;
mod test_fold;
mod test_selection;
mod utils;
