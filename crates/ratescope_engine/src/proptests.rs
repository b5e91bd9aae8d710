//! Property tests over randomly generated rule tables.
