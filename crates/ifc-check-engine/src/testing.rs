// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared STEP fixtures for unit tests

use ifc_check_model::IfcModel;
use std::sync::Arc;

/// Small office model
///
/// - storeys: `Level 1` (#4) and an unnamed storey (#5)
/// - walls: #10 `Wall A` (REI60, external, in Level 1, with geometry),
///   #11 `Wall B` standard case (REI30, in the unnamed storey, with geometry),
///   #12 `Wall C` (no properties, no geometry),
///   #13 unnamed wall whose property set points at a missing property
/// - #10 to #12 carry a Uniclass classification, #13 does not
/// - door #20 (EI30), spaces #30 (-5 m2), #31 (1500 m2), #32 ('n/a')
pub const OFFICE_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('office.ifc','2024-05-01T09:00:00',('Architect'),('Studio'),'Preprocessor','Modeler','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCPROJECT('0YvctVUKr0kugbFTf53O9L',$,'Office',$,$,$,$,$,$);
#2=IFCSITE('1YvctVUKr0kugbFTf53O9L',$,'Site',$,$,$,$,$,.ELEMENT.,$,$,$,$,$);
#3=IFCBUILDING('2YvctVUKr0kugbFTf53O9L',$,'Building',$,$,$,$,$,.ELEMENT.,$,$,$);
#4=IFCBUILDINGSTOREY('3YvctVUKr0kugbFTf53O9L',$,'Level 1',$,$,$,$,$,.ELEMENT.,0.);
#5=IFCBUILDINGSTOREY('4YvctVUKr0kugbFTf53O9L',$,$,$,$,$,$,$,.ELEMENT.,3000.);
#10=IFCWALL('0aWall0000000000000000',$,'Wall A',$,$,$,#90,$,$);
#11=IFCWALLSTANDARDCASE('0bWall0000000000000000',$,'Wall B',$,$,$,#90,$,$);
#12=IFCWALL('0cWall0000000000000000',$,'Wall C',$,$,$,$,$,$);
#13=IFCWALL($,$,$,$,$,$,$,$,$);
#20=IFCDOOR('0aDoor0000000000000000',$,'Door 1',$,$,$,#90,$,$,$,$,$,$);
#30=IFCSPACE('0aSpace000000000000000',$,'Room',$,$,$,$,$,.ELEMENT.,.INTERNAL.,$);
#31=IFCSPACE('0bSpace000000000000000',$,'Hall',$,$,$,$,$,.ELEMENT.,.INTERNAL.,$);
#32=IFCSPACE('0cSpace000000000000000',$,'Store',$,$,$,$,$,.ELEMENT.,.INTERNAL.,$);
#40=IFCPROPERTYSINGLEVALUE('IsExternal',$,IFCBOOLEAN(.T.),$);
#41=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('REI60'),$);
#42=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('REI30'),$);
#43=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('EI30'),$);
#44=IFCPROPERTYSINGLEVALUE('GrossFloorArea',$,IFCAREAMEASURE(-5.),$);
#45=IFCPROPERTYSINGLEVALUE('GrossFloorArea',$,IFCAREAMEASURE(1500.),$);
#46=IFCPROPERTYSINGLEVALUE('GrossFloorArea',$,IFCLABEL('n/a'),$);
#47=IFCPROPERTYSINGLEVALUE('Elevation',$,IFCLENGTHMEASURE(0.),$);
#50=IFCPROPERTYSET('0aPset00000000000000000',$,'Pset_WallCommon',$,(#40,#41));
#51=IFCPROPERTYSET('0bPset00000000000000000',$,'Pset_WallCommon',$,(#42));
#52=IFCPROPERTYSET('0cPset00000000000000000',$,'Pset_WallCommon',$,(#999));
#53=IFCPROPERTYSET('0dPset00000000000000000',$,'Pset_DoorCommon',$,(#43));
#54=IFCPROPERTYSET('0ePset00000000000000000',$,'Pset_SpaceCommon',$,(#44));
#55=IFCPROPERTYSET('0fPset00000000000000000',$,'Pset_SpaceCommon',$,(#45));
#56=IFCPROPERTYSET('0gPset00000000000000000',$,'Pset_SpaceCommon',$,(#46));
#57=IFCPROPERTYSET('0hPset00000000000000000',$,'Pset_BuildingStoreyCommon',$,(#47));
#60=IFCRELDEFINESBYPROPERTIES('0aRel000000000000000000',$,$,$,(#10),#50);
#61=IFCRELDEFINESBYPROPERTIES('0bRel000000000000000000',$,$,$,(#11),#51);
#62=IFCRELDEFINESBYPROPERTIES('0cRel000000000000000000',$,$,$,(#13),#52);
#63=IFCRELDEFINESBYPROPERTIES('0dRel000000000000000000',$,$,$,(#20),#53);
#64=IFCRELDEFINESBYPROPERTIES('0eRel000000000000000000',$,$,$,(#30),#54);
#65=IFCRELDEFINESBYPROPERTIES('0fRel000000000000000000',$,$,$,(#31),#55);
#66=IFCRELDEFINESBYPROPERTIES('0gRel000000000000000000',$,$,$,(#32),#56);
#67=IFCRELDEFINESBYPROPERTIES('0hRel000000000000000000',$,$,$,(#4),#57);
#70=IFCRELCONTAINEDINSPATIALSTRUCTURE('0iRel000000000000000000',$,$,$,(#10,#20),#4);
#71=IFCRELCONTAINEDINSPATIALSTRUCTURE('0jRel000000000000000000',$,$,$,(#11),#5);
#80=IFCCLASSIFICATION('NBS','2021',$,'Uniclass 2015',$,$,$);
#81=IFCCLASSIFICATIONREFERENCE($,'EF_25_10','Walls',#80,$,$);
#82=IFCRELASSOCIATESCLASSIFICATION('0kRel000000000000000000',$,$,$,(#10,#11,#12),#81);
#90=IFCPRODUCTDEFINITIONSHAPE($,$,());
ENDSEC;
END-ISO-10303-21;
"#;

/// Minimal model: a project and nothing else
pub const EMPTY_PROJECT_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#1=IFCPROJECT('0YvctVUKr0kugbFTf53O9L',$,'Empty',$,$,$,$,$,$);
ENDSEC;
END-ISO-10303-21;
"#;

pub fn office() -> Arc<dyn IfcModel> {
    ifc_check_parser::parse(OFFICE_IFC).unwrap()
}

pub fn empty_project() -> Arc<dyn IfcModel> {
    ifc_check_parser::parse(EMPTY_PROJECT_IFC).unwrap()
}
