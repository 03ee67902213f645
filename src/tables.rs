/// The `cmap` (Character To Glyph Index Mapping) table
pub mod cmap;
/// The `glyf` (Glyph data) table
pub mod glyf;
/// The `head` (Header) table
pub mod head;
/// The `hhea` (Horizontal header) table
pub mod hhea;
/// The `hmtx` (Horizontal metrics) table
pub mod hmtx;
/// The `loca` (Index to Location) table
pub mod loca;
/// The `maxp` (Maximum profile) table
pub mod maxp;
/// The `OS/2` (OS/2 and Windows Metrics) table, patched in place
pub mod os2;
/// The `post` (PostScript) table
pub mod post;
