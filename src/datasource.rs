use std::fmt;

use crate::error::{Error, Result};

macro_rules! datasources {
    ($($(#[$meta:meta])* $name:ident = $id:literal => $desc:literal,)+) => {
        /// Image datasources hosted by the Helioviewer Project.
        ///
        /// Each variant is one observatory/instrument/measurement combination,
        /// identified on the wire by its integer id.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum DataSource {
            $($(#[$meta])* $name = $id,)+
        }

        impl DataSource {
            /// Every known datasource, in id order.
            pub const ALL: &'static [DataSource] = &[$(DataSource::$name,)+];

            pub fn id(self) -> i64 {
                self as i64
            }

            pub fn description(self) -> &'static str {
                match self {
                    $(DataSource::$name => $desc,)+
                }
            }

            pub fn from_id(id: i64) -> Option<Self> {
                match id {
                    $($id => Some(DataSource::$name),)+
                    _ => None,
                }
            }
        }
    };
}

datasources! {
    Eit171 = 0 => "SOHO EIT 171",
    Eit195 = 1 => "SOHO EIT 195",
    Eit284 = 2 => "SOHO EIT 284",
    Eit304 = 3 => "SOHO EIT 304",
    LascoC2 = 4 => "SOHO LASCO C2",
    LascoC3 = 5 => "SOHO LASCO C3",
    MdiMag = 6 => "SOHO MDI magnetogram",
    MdiInt = 7 => "SOHO MDI continuum",
    Aia94 = 8 => "SDO AIA 94",
    Aia131 = 9 => "SDO AIA 131",
    Aia171 = 10 => "SDO AIA 171",
    Aia193 = 11 => "SDO AIA 193",
    Aia211 = 12 => "SDO AIA 211",
    Aia304 = 13 => "SDO AIA 304",
    Aia335 = 14 => "SDO AIA 335",
    Aia1600 = 15 => "SDO AIA 1600",
    Aia1700 = 16 => "SDO AIA 1700",
    Aia4500 = 17 => "SDO AIA 4500",
    HmiInt = 18 => "SDO HMI continuum",
    HmiMag = 19 => "SDO HMI magnetogram",
    EuviA171 = 20 => "STEREO-A SECCHI EUVI 171",
    EuviA195 = 21 => "STEREO-A SECCHI EUVI 195",
    EuviA284 = 22 => "STEREO-A SECCHI EUVI 284",
    EuviA304 = 23 => "STEREO-A SECCHI EUVI 304",
    EuviB171 = 24 => "STEREO-B SECCHI EUVI 171",
    EuviB195 = 25 => "STEREO-B SECCHI EUVI 195",
    EuviB284 = 26 => "STEREO-B SECCHI EUVI 284",
    EuviB304 = 27 => "STEREO-B SECCHI EUVI 304",
    Cor1A = 28 => "STEREO-A SECCHI COR1 white-light",
    Cor2A = 29 => "STEREO-A SECCHI COR2 white-light",
    Cor1B = 30 => "STEREO-B SECCHI COR1 white-light",
    Cor2B = 31 => "STEREO-B SECCHI COR2 white-light",
    Swap174 = 32 => "PROBA2 SWAP 174",
    SxtAlMgMn = 33 => "Yohkoh SXT AlMgMn",
    SxtThinAl = 34 => "Yohkoh SXT thin-Al",
    SxtWhiteLight = 35 => "Yohkoh SXT white-light",
    XrtAlMedAlMesh = 38 => "Hinode XRT Al_med/Al_mesh",
    XrtAlMedAlThick = 39 => "Hinode XRT Al_med/Al_thick",
    XrtAlMedBeThick = 40 => "Hinode XRT Al_med/Be_thick",
    XrtAlMedGband = 41 => "Hinode XRT Al_med/GBand",
    XrtAlMedOpen = 42 => "Hinode XRT Al_med/Open",
    XrtAlMedTiPoly = 43 => "Hinode XRT Al_med/Ti_poly",
    XrtAlPolyAlMesh = 44 => "Hinode XRT Al_poly/Al_mesh",
    XrtAlPolyAlThick = 45 => "Hinode XRT Al_poly/Al_thick",
    XrtAlPolyBeThick = 46 => "Hinode XRT Al_poly/Be_thick",
    XrtAlPolyGband = 47 => "Hinode XRT Al_poly/GBand",
    XrtAlPolyOpen = 48 => "Hinode XRT Al_poly/Open",
    XrtAlPolyTiPoly = 49 => "Hinode XRT Al_poly/Ti_poly",
    XrtBeMedAlMesh = 50 => "Hinode XRT Be_med/Al_mesh",
    XrtBeMedAlThick = 51 => "Hinode XRT Be_med/Al_thick",
    XrtBeMedBeThick = 52 => "Hinode XRT Be_med/Be_thick",
    XrtBeMedGband = 53 => "Hinode XRT Be_med/GBand",
    XrtBeMedOpen = 54 => "Hinode XRT Be_med/Open",
    XrtBeMedTiPoly = 55 => "Hinode XRT Be_med/Ti_poly",
    XrtBeThinAlMesh = 56 => "Hinode XRT Be_thin/Al_mesh",
    XrtBeThinAlThick = 57 => "Hinode XRT Be_thin/Al_thick",
    XrtBeThinBeThick = 58 => "Hinode XRT Be_thin/Be_thick",
    XrtBeThinGband = 59 => "Hinode XRT Be_thin/GBand",
    XrtBeThinOpen = 60 => "Hinode XRT Be_thin/Open",
    XrtBeThinTiPoly = 61 => "Hinode XRT Be_thin/Ti_poly",
    XrtCPolyAlMesh = 62 => "Hinode XRT C_poly/Al_mesh",
    XrtCPolyAlThick = 63 => "Hinode XRT C_poly/Al_thick",
    XrtCPolyBeThick = 64 => "Hinode XRT C_poly/Be_thick",
    XrtCPolyGband = 65 => "Hinode XRT C_poly/GBand",
    XrtCPolyOpen = 66 => "Hinode XRT C_poly/Open",
    XrtCPolyTiPoly = 67 => "Hinode XRT C_poly/Ti_poly",
    XrtMispositioned = 68 => "Hinode XRT Mispositioned/Mispositioned",
    XrtOpenAlMesh = 69 => "Hinode XRT Open/Al_mesh",
    XrtOpenAlThick = 70 => "Hinode XRT Open/Al_thick",
    XrtOpenBeThick = 71 => "Hinode XRT Open/Be_thick",
    XrtOpenGband = 72 => "Hinode XRT Open/GBand",
    XrtOpenOpen = 73 => "Hinode XRT Open/Open",
    XrtOpenTiPoly = 74 => "Hinode XRT Open/Ti_poly",
    Trace171 = 75 => "TRACE 171",
    Trace195 = 76 => "TRACE 195",
    Trace284 = 77 => "TRACE 284",
    Trace1216 = 78 => "TRACE 1216",
    Trace1550 = 79 => "TRACE 1550",
    Trace1600 = 80 => "TRACE 1600",
    Trace1700 = 81 => "TRACE 1700",
    TraceWhiteLight = 82 => "TRACE white-light",
    CosmoKcor = 83 => "MLSO COSMO KCor 735",
    EuiFsi174 = 84 => "Solar Orbiter EUI FSI 174",
    EuiFsi304 = 85 => "Solar Orbiter EUI FSI 304",
    EuiHri174 = 86 => "Solar Orbiter EUI HRI 174",
    EuiHri1216 = 87 => "Solar Orbiter EUI HRI 1216",
    Suvi94 = 88 => "GOES-R SUVI 94",
    Suvi131 = 89 => "GOES-R SUVI 131",
    Suvi171 = 90 => "GOES-R SUVI 171",
    Suvi195 = 91 => "GOES-R SUVI 195",
    Suvi284 = 92 => "GOES-R SUVI 284",
    Suvi304 = 93 => "GOES-R SUVI 304",
    // XRT wildcard selections: any filter wheel position on one side.
    XrtAnyAny = 10001 => "Hinode XRT any/any",
    XrtAnyAlMesh = 10002 => "Hinode XRT any/Al_mesh",
    XrtAnyAlThick = 10003 => "Hinode XRT any/Al_thick",
    XrtAnyBeThick = 10004 => "Hinode XRT any/Be_thick",
    XrtAnyGband = 10005 => "Hinode XRT any/GBand",
    XrtAnyOpen = 10006 => "Hinode XRT any/Open",
    XrtAnyTiPoly = 10007 => "Hinode XRT any/Ti_poly",
    XrtAlMedAny = 10008 => "Hinode XRT Al_med/any",
    XrtAlPolyAny = 10009 => "Hinode XRT Al_poly/any",
    XrtBeMedAny = 10010 => "Hinode XRT Be_med/any",
    XrtBeThinAny = 10011 => "Hinode XRT Be_thin/any",
    XrtCPolyAny = 10012 => "Hinode XRT C_poly/any",
    XrtOpenAny = 10013 => "Hinode XRT Open/any",
}

impl TryFrom<i64> for DataSource {
    type Error = Error;

    fn try_from(id: i64) -> Result<Self> {
        DataSource::from_id(id)
            .ok_or_else(|| Error::validation("sourceId", format!("{id} is not a valid DataSource")))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Either a typed [`DataSource`] or a raw id that still has to be checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRef {
    Known(DataSource),
    Id(i64),
}

impl SourceRef {
    pub fn resolve(self) -> Result<DataSource> {
        match self {
            SourceRef::Known(ds) => Ok(ds),
            SourceRef::Id(id) => DataSource::try_from(id),
        }
    }
}

impl From<DataSource> for SourceRef {
    fn from(ds: DataSource) -> Self {
        SourceRef::Known(ds)
    }
}

impl From<i64> for SourceRef {
    fn from(id: i64) -> Self {
        SourceRef::Id(id)
    }
}

impl From<i32> for SourceRef {
    fn from(id: i32) -> Self {
        SourceRef::Id(i64::from(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_lookup() {
        for ds in DataSource::ALL {
            assert_eq!(DataSource::from_id(ds.id()), Some(*ds));
        }
        assert_eq!(DataSource::ALL.len(), 105);
    }

    #[test]
    fn unknown_id_is_rejected() {
        let err = DataSource::try_from(999i64).unwrap_err();
        assert!(err.to_string().contains("999 is not a valid DataSource"));
        // 36 and 37 are gaps in the SXT/XRT numbering.
        assert!(DataSource::from_id(36).is_none());
        assert!(DataSource::from_id(37).is_none());
    }

    #[test]
    fn source_ref_resolution() {
        assert_eq!(SourceRef::from(9).resolve().unwrap(), DataSource::Aia131);
        assert_eq!(
            SourceRef::from(DataSource::Aia94).resolve().unwrap(),
            DataSource::Aia94
        );
        assert!(SourceRef::from(-1i64).resolve().is_err());
    }

    #[test]
    fn description_and_display() {
        assert_eq!(DataSource::Aia171.description(), "SDO AIA 171");
        assert_eq!(DataSource::XrtOpenAny.to_string(), "10013");
    }
}
