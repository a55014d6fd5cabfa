//! Fixed lookup tables of the PMPJ questionnaire.
//!
//! Each table lists its labels in canonical order. That order is part of the
//! table definition: it drives tie-breaking in
//! [`pick_dominant`](crate::scoring::category::pick_dominant) and the column
//! order of stored records. Labels are kept byte-for-byte as they appear on
//! the form, since they double as record column names.

use serde::Serialize;

/// An ordered label → weight table with the label used when nothing was
/// counted.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CategoryTable {
    pub name: &'static str,
    pub entries: &'static [(&'static str, u32)],
    pub default_label: &'static str,
}

impl CategoryTable {
    /// Weight for `label`; labels absent from the table weigh 0.
    pub fn weight(&self, label: &str) -> u32 {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, w)| *w)
            .unwrap_or(0)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|(l, _)| *l == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(l, _)| *l)
    }
}

// ---------------------------------------------------------------------------
// Client profile
// ---------------------------------------------------------------------------

pub static PROFILE: CategoryTable = CategoryTable {
    name: "profil",
    default_label: "w. Lain-lain",
    entries: &[
        ("a. Pengusaha/wiraswasta", 9),
        ("b.  PNS (termasuk pensiunan)", 4),
        ("c.  Ibu Rumah Tangga", 2),
        ("d.  Pelajar/Mahasiswa", 2),
        ("e.  Pegawai Swasta", 7),
        ("f.  Pejabat Lembaga Legislatif dan Pemerintah", 4),
        ("g.  TNI/POLRI (termasuk Pensiunan)", 3),
        ("h. Pegawai BI/BUMN/BUMD (termasuk Pensiunan)", 2),
        ("i.  Profesional dan Konsultan", 6),
        ("j.  Pedagang", 5),
        ("k.  Pegawai Bank", 2),
        ("l. Pegawai Money Changer", 1),
        ("m. Pengajar dan Dosen", 2),
        ("n. Petani", 1),
        ("o.  Korporasi Perseroan Terbatas", 7),
        ("p.  Korporasi Koperasi", 2),
        ("q.  Korporasi Yayasan", 2),
        ("r.  Korporasi CV, Firma, dan Maatschap", 2),
        ("s.  Korporasi Perkumpulan Badan Hukum", 2),
        ("t.  Korporasi Perkumpulan Tidak Badan Hukum", 2),
        ("u.  Pengurus Parpol", 2),
        ("v.  Bertindak berdasarkan Kuasa", 2),
        ("w. Lain-lain", 1),
    ],
};

// ---------------------------------------------------------------------------
// Client business sector
// ---------------------------------------------------------------------------

pub static BUSINESS: CategoryTable = CategoryTable {
    name: "bisnis",
    default_label: "n. Lain-lain....",
    entries: &[
        ("a. Perdagangan", 9),
        ("b. Pertambangan", 4),
        ("c. Pertanian", 1),
        ("d. Perikanan", 1),
        ("e. Perkebunan", 1),
        ("f. Perindustrian", 2),
        ("g. Perbankan", 3),
        ("h. Pembiayaan", 4),
        ("i. Pembangunan Property", 3),
        ("j. Kontraktor", 2),
        ("k. Konsultan", 1),
        ("l. Transportasi Barang dan Orang", 1),
        ("m. Usaha Sewa Menyewa", 2),
        ("n. Lain-lain....", 1),
    ],
};

// ---------------------------------------------------------------------------
// Notarial service used
// ---------------------------------------------------------------------------

pub static SERVICE: CategoryTable = CategoryTable {
    name: "jasa",
    default_label: "h. Lain-lain",
    entries: &[
        ("a.  Pembelian dan Penjualan Properti", 9),
        ("b.  Pengurusan Perizinan Badan Usaha", 7),
        ("c.  Penitipan Pembayaran Pajak terkait Pengalihan Property", 3),
        ("d.  Pengurusan Pembelian dan Penjualan Badan Usaha", 3),
        ("e.  Pengelolaan terhadap Uang, Efek, dan/atau Produk Jasa Keuangan lainnya", 4),
        (
            "f.  Pengelolaan Rekening Giro, Rekening Tabungan, Rekening Deposito, dan/atau Rekening Efek",
            2,
        ),
        ("g.  Pengoperasian dan Pengelolaan Perusahaan", 3),
        ("h. Lain-lain", 1),
    ],
};

// ---------------------------------------------------------------------------
// Deed product (recorded, not scored)
// ---------------------------------------------------------------------------

pub static PRODUCT: CategoryTable = CategoryTable {
    name: "produk",
    default_label: "x. Akta lainnya sesuai dengan ketentuan peraturan perundang-undangan ",
    entries: &[
        ("a. Akta pembayaran uang sewa, bunga, dan pensiun ", 4),
        ("b. Akta penawaran pembayaran tunai ", 4),
        ("c.  Akta protes terhadap tidak dibayarnya atau tidak diterimanya surat berharga ", 2),
        ("d. Akta Kuasa", 4),
        ("e. Akta keterangan kepemilikan", 5),
        ("f. Akta Hibah (Barang Bergerak)", 4),
        ("g. Akta Wasiat", 2),
        ("h. Akta Jaminan Fidusia ", 3),
        ("i. Akta Pendirian Perseroan Terbatas ", 8),
        ("j. Akta Perubahan Perseroan Terbatas  ", 5),
        ("k. Akta Pendirian dan Perubahan Koperasi ", 3),
        ("l. Akta Pendirian dan Perubahan Yayasan (Nirlaba) ", 3),
        (
            "m. Akta Pendirian dan Perubahan CV, Firma dan Maatschap (Persekutuan Perdata) - Badan usaha yang tidak berbadan hukum ",
            3,
        ),
        ("n. Akta Pendirian dan Perubahan Perkumpulan Badan Hukum (Sosial/Nirlaba) ", 3),
        ("o. Akta Pendirian dan Perubahan Perkumpulan Tidak Berbadan Hukum (Sosial/Nirlaba) ", 3),
        ("p. Akta Pendirian dan Perubahan Partai Politik ", 2),
        ("q. Akta Perjanjian Sewa Menyewa ", 3),
        ("r. Akta Perjanjian Pengikatan Jual Beli ", 8),
        ("s. Akta Perjanjian Kerjasama ", 4),
        ("t. Akta Perjanjian BOT (Build Operate Transfer/Bangun Kelola Serah) ", 2),
        ("u. Akta Perjanjian JO (Joint Operation/Kerjasama Operasional Mengelola Proyek) ", 2),
        ("v. Akta Perjanjian Kredit ", 4),
        ("w. Akta Pinjam Meminjam/Pengakuan Hutang ", 4),
        ("x. Akta lainnya sesuai dengan ketentuan peraturan perundang-undangan ", 3),
    ],
};

// ---------------------------------------------------------------------------
// Client country of origin / destination
// ---------------------------------------------------------------------------

pub static COUNTRY: CategoryTable = CategoryTable {
    name: "negara",
    default_label: "e.  Asia lainnya",
    entries: &[
        ("a.  Tax Haven Country", 6),
        ("b.  RRT (Tiongkok)", 8),
        ("c.  Malaysia", 7),
        ("d.  Singapura", 7),
        ("e.  Asia lainnya", 8),
        ("f.  Afrika", 1),
        ("g.  Amerika", 5),
        ("h.  Eropa", 6),
        ("i.  Australia dan Selandia Baru", 5),
    ],
};

// ---------------------------------------------------------------------------
// Single-choice tables
// ---------------------------------------------------------------------------

/// Whether the notary has been summoned or questioned by law enforcement.
pub static ENFORCEMENT: &[(&str, u32)] = &[("YA", 6), ("TIDAK", 1)];

/// Province of the notary's office.
pub static REGION: &[(&str, u32)] = &[
    ("DKI Jakarta", 9),
    ("Jawa Barat", 6),
    ("Jawa Timur", 6),
    ("Aceh", 5),
    ("Jawa Tengah", 4),
    ("Kalimantan Timur", 4),
    ("Banten", 3),
    ("Kepulauan Riau", 3),
    ("Lampung", 3),
    ("Sulawasi Selatan", 3),
    ("Sumatera Utara", 3),
    ("Sulawasi Tenggara", 3),
    ("Sulawesi Utara", 3),
    ("Sumatera Selatan", 3),
    ("DI Yogyakarta", 3),
    ("Bali", 2),
    ("Riau", 2),
    ("Bangka Belitung", 2),
    ("Bengkulu", 2),
    ("Kalimantan Tengah", 2),
    ("Maluku Utara", 2),
    ("Nusa Tenggara Timur", 2),
    ("Papua", 2),
    ("Sulawesi Barat", 2),
    ("Sulawesi Tengah", 2),
    ("Gorontalo", 2),
    ("Jambi", 2),
    ("Kalimantan Selatan", 2),
    ("Maluku", 2),
    ("Nusa Tenggara Barat", 2),
    ("Papua Barat", 2),
    ("Sumatera Barat", 2),
    ("Kalimantan Barat", 1),
    ("Kalimantan Utara", 1),
];

/// Exact lookup in a single-choice table; unknown values score 0.
pub fn lookup(table: &[(&str, u32)], value: &str) -> u32 {
    table
        .iter()
        .find(|(l, _)| *l == value)
        .map(|(_, w)| *w)
        .unwrap_or(0)
}
